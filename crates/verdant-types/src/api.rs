use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::messages::MessageType;

// -- Messages --

/// Body of a send call. The backend assigns the id, sender, status and
/// timestamps; everything else a message can carry is chosen here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<String>,
    /// Makes the message ephemeral.
    #[serde(default, with = "crate::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<String>,
    /// Free-form plant payload; `null` means none.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub plant_data: Value,
}

impl SendMessageRequest {
    /// Plain text message to `receiver_id`.
    pub fn text(receiver_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            receiver_id: receiver_id.into(),
            content: content.into(),
            message_type: MessageType::Text,
            media_url: None,
            thumbnail_url: None,
            metadata: None,
            reply_to_message_id: None,
            expires_at: None,
            plant_id: None,
            plant_data: Value::Null,
        }
    }
}

// -- Reactions --

/// All reactions on one message sharing the same emoji.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionGroup {
    pub emoji: String,
    pub count: usize,
    pub user_ids: Vec<String>,
}
