use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::messages::Message;
use crate::models::User;

pub const UNKNOWN_USER: &str = "Unknown User";
pub const NO_MESSAGES_PREVIEW: &str = "No messages yet";

/// A 1:1 thread as seen by `user_id`.
///
/// `last_message`, `unread_count` and `other_user` are denormalized by the
/// backend and may lag behind the actual thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    #[serde(alias = "otherUnserId")]
    pub other_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub is_muted: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default, with = "crate::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub last_read_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_user: Option<User>,
}

impl Conversation {
    /// Copy with everything marked read as of `at`.
    pub fn mark_read(&self, at: DateTime<Utc>) -> Self {
        Self {
            unread_count: 0,
            last_read_at: Some(at),
            ..self.clone()
        }
    }

    /// Copy with `message` as the newest entry. Messages addressed to the
    /// viewing user bump the unread count; our own outgoing ones don't.
    pub fn with_incoming(&self, message: Message) -> Self {
        let unread_count = if message.receiver_id == self.user_id {
            self.unread_count.saturating_add(1)
        } else {
            self.unread_count
        };
        Self {
            last_message: Some(message),
            unread_count,
            ..self.clone()
        }
    }

    pub fn has_unread_messages(&self) -> bool {
        self.unread_count > 0
    }

    pub fn display_name(&self) -> &str {
        self.other_user
            .as_ref()
            .map_or(UNKNOWN_USER, |u| u.display_name.as_str())
    }

    pub fn display_picture(&self) -> Option<&str> {
        self.other_user
            .as_ref()
            .and_then(|u| u.profile_picture_url.as_deref())
    }

    pub fn last_message_preview(&self, now: DateTime<Utc>) -> Cow<'_, str> {
        match &self.last_message {
            Some(m) => m.display_content(now),
            None => Cow::Borrowed(NO_MESSAGES_PREVIEW),
        }
    }

    /// Empty when the thread has no messages yet.
    pub fn last_message_time(&self, now: DateTime<Utc>) -> String {
        self.last_message
            .as_ref()
            .map(|m| m.time_ago(now))
            .unwrap_or_default()
    }

    pub fn is_online(&self) -> bool {
        self.other_user.as_ref().is_some_and(|u| u.is_online)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{MessageStatus, MessageType};
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 18, 0, 0).unwrap()
    }

    fn conversation() -> Conversation {
        Conversation {
            id: "conv-1".into(),
            user_id: "alice".into(),
            other_user_id: "bob".into(),
            last_message: None,
            unread_count: 0,
            is_muted: false,
            is_archived: false,
            is_blocked: false,
            last_read_at: None,
            other_user: None,
        }
    }

    fn bob(online: bool) -> User {
        User {
            id: "bob".into(),
            username: "bob_grows".into(),
            display_name: "Bob".into(),
            profile_picture_url: Some("https://cdn.example/bob.png".into()),
            is_online: online,
            last_seen_at: None,
        }
    }

    fn message_to(receiver_id: &str, message_type: MessageType) -> Message {
        Message {
            id: "msg-9".into(),
            sender_id: "bob".into(),
            receiver_id: receiver_id.into(),
            content: "water it twice a week".into(),
            message_type,
            status: MessageStatus::Delivered,
            created_at: now() - TimeDelta::minutes(5),
            updated_at: None,
            media_url: None,
            thumbnail_url: None,
            metadata: None,
            reply_to_message_id: None,
            expires_at: None,
            is_edited: false,
            edited_at: None,
            plant_id: None,
            plant_data: serde_json::Value::Null,
            sender: None,
        }
    }

    #[test]
    fn test_empty_thread_preview() {
        let conv = conversation();
        assert_eq!(conv.last_message_preview(now()), "No messages yet");
        assert_eq!(conv.last_message_time(now()), "");
        assert!(!conv.has_unread_messages());
    }

    #[test]
    fn test_preview_uses_display_content() {
        let conv = Conversation {
            last_message: Some(message_to("alice", MessageType::PlantCareTip)),
            ..conversation()
        };
        assert_eq!(conv.last_message_preview(now()), "💡 Plant Care Tip");
        assert_eq!(conv.last_message_time(now()), "5m");
    }

    #[test]
    fn test_without_joined_user() {
        let conv = conversation();
        assert_eq!(conv.display_name(), "Unknown User");
        assert_eq!(conv.display_picture(), None);
        assert!(!conv.is_online());
    }

    #[test]
    fn test_with_joined_user() {
        let conv = Conversation {
            other_user: Some(bob(true)),
            ..conversation()
        };
        assert_eq!(conv.display_name(), "Bob");
        assert_eq!(conv.display_picture(), Some("https://cdn.example/bob.png"));
        assert!(conv.is_online());
    }

    #[test]
    fn test_incoming_then_mark_read() {
        let conv = conversation()
            .with_incoming(message_to("alice", MessageType::Text))
            .with_incoming(message_to("alice", MessageType::Image));
        assert_eq!(conv.unread_count, 2);
        assert!(conv.has_unread_messages());

        let outgoing = conv.with_incoming(message_to("bob", MessageType::Text));
        assert_eq!(outgoing.unread_count, 2);

        let read = conv.mark_read(now());
        assert_eq!(read.unread_count, 0);
        assert_eq!(read.last_read_at, Some(now()));
        assert_eq!(conv.unread_count, 2);
    }
}
