use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::api::SendMessageRequest;
use crate::models::User;

/// Shown in place of the body once an ephemeral message has expired.
pub const EXPIRED_PLACEHOLDER: &str = "This message has expired";

/// How the payload of a message should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    Video,
    Audio,
    File,
    Location,
    PlantIdentification,
    PlantCareTip,
}

/// Display buckets. Every `MessageType` falls into exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    Text,
    Media,
    File,
    Location,
    Plant,
}

impl MessageType {
    pub const ALL: [MessageType; 8] = [
        Self::Text,
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::File,
        Self::Location,
        Self::PlantIdentification,
        Self::PlantCareTip,
    ];

    pub fn category(self) -> ContentCategory {
        match self {
            Self::Text => ContentCategory::Text,
            Self::Image | Self::Video | Self::Audio => ContentCategory::Media,
            Self::File => ContentCategory::File,
            Self::Location => ContentCategory::Location,
            Self::PlantIdentification | Self::PlantCareTip => ContentCategory::Plant,
        }
    }

    /// Label rendered instead of the body for non-text messages.
    /// `None` for text, whose body is shown as-is.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::Text => None,
            Self::Image => Some("📷 Photo"),
            Self::Video => Some("🎥 Video"),
            Self::Audio => Some("🎵 Audio"),
            Self::File => Some("📎 File"),
            Self::Location => Some("📍 Location"),
            Self::PlantIdentification => Some("🌿 Plant Identification"),
            Self::PlantCareTip => Some("💡 Plant Care Tip"),
        }
    }

    /// Wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
            Self::Location => "location",
            Self::PlantIdentification => "plant_identification",
            Self::PlantCareTip => "plant_care_tip",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery state of a message. Transitions are driven by the send/receipt
/// path; nothing here enforces an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Sending,
    Sent,
    Delivered,
    Read,
    Failed,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single direct message.
///
/// `content` is always present; for media and plant messages it carries an
/// optional caption and may be empty. `sender` is a denormalized copy filled
/// in by the query layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "crate::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<String>,
    #[serde(default, with = "crate::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default, with = "crate::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<String>,
    /// Free-form plant payload; `null` means none.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub plant_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
}

impl Message {
    /// Optimistic local copy of an outgoing message, shown while the send is
    /// in flight. Gets a temporary UUIDv4 id until the backend assigns one.
    pub fn local_echo(
        sender_id: impl Into<String>,
        request: SendMessageRequest,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: sender_id.into(),
            receiver_id: request.receiver_id,
            content: request.content,
            message_type: request.message_type,
            status: MessageStatus::Sending,
            created_at: now,
            updated_at: None,
            media_url: request.media_url,
            thumbnail_url: request.thumbnail_url,
            metadata: request.metadata,
            reply_to_message_id: request.reply_to_message_id,
            expires_at: request.expires_at,
            is_edited: false,
            edited_at: None,
            plant_id: request.plant_id,
            plant_data: request.plant_data,
            sender: None,
        }
    }

    pub fn with_status(&self, status: MessageStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Copy with replaced content, flagged as edited at `at`.
    pub fn edited(&self, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            is_edited: true,
            edited_at: Some(at),
            updated_at: Some(at),
            ..self.clone()
        }
    }

    pub fn category(&self) -> ContentCategory {
        self.message_type.category()
    }

    pub fn is_text(&self) -> bool {
        self.category() == ContentCategory::Text
    }

    /// Image, video or audio.
    pub fn is_media(&self) -> bool {
        self.category() == ContentCategory::Media
    }

    pub fn is_file(&self) -> bool {
        self.category() == ContentCategory::File
    }

    pub fn is_location(&self) -> bool {
        self.category() == ContentCategory::Location
    }

    pub fn is_plant_related(&self) -> bool {
        self.category() == ContentCategory::Plant
    }

    /// Inclusive: delivered and read messages also count as sent.
    pub fn is_sent(&self) -> bool {
        matches!(
            self.status,
            MessageStatus::Sent | MessageStatus::Delivered | MessageStatus::Read
        )
    }

    /// Inclusive: read messages also count as delivered.
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, MessageStatus::Delivered | MessageStatus::Read)
    }

    pub fn is_read(&self) -> bool {
        self.status == MessageStatus::Read
    }

    pub fn is_failed(&self) -> bool {
        self.status == MessageStatus::Failed
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Sending
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to_message_id.is_some()
    }

    /// True once `now` is strictly past `expires_at`. Messages without an
    /// expiry never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }

    /// `None` for non-ephemeral messages, zero once expired.
    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.expires_at.map(|at| {
            if now >= at {
                TimeDelta::zero()
            } else {
                at - now
            }
        })
    }

    /// Text to render for this message in a bubble or a preview line.
    pub fn display_content(&self, now: DateTime<Utc>) -> Cow<'_, str> {
        if self.is_expired(now) {
            return Cow::Borrowed(EXPIRED_PLACEHOLDER);
        }
        match self.message_type.placeholder() {
            Some(label) => Cow::Borrowed(label),
            None => Cow::Borrowed(self.content.as_str()),
        }
    }

    /// Coarse age label: "Just now", "{n}m", "{n}h", "{n}d", then the
    /// creation date as "{day}/{month}" from a week onwards.
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(self.created_at);

        if elapsed < TimeDelta::minutes(1) {
            "Just now".to_string()
        } else if elapsed < TimeDelta::hours(1) {
            format!("{}m", elapsed.num_minutes())
        } else if elapsed < TimeDelta::days(1) {
            format!("{}h", elapsed.num_hours())
        } else if elapsed < TimeDelta::days(7) {
            format!("{}d", elapsed.num_days())
        } else {
            format!("{}/{}", self.created_at.day(), self.created_at.month())
        }
    }
}
