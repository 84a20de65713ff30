//! JSON object mapping for every wire record.
//!
//! Field names are camelCase, enum tags are their lowercase literals and
//! timestamps are ISO-8601 strings (see `timestamp`). Absent optionals are
//! left out of the encoded object; `null` on input reads as absent. Unknown
//! keys are ignored so older clients keep working when the backend adds
//! fields.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::api::SendMessageRequest;
use crate::conversations::Conversation;
use crate::error::SchemaError;
use crate::messages::Message;
use crate::models::User;
use crate::reactions::MessageReaction;

pub trait Payload: Serialize + DeserializeOwned {
    /// Record name used in errors and logs.
    const RECORD: &'static str;

    fn to_payload(&self) -> Result<Map<String, Value>, SchemaError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(SchemaError::NotAnObject {
                record: Self::RECORD,
            }),
            Err(source) => Err(SchemaError::Encode {
                record: Self::RECORD,
                source,
            }),
        }
    }

    fn from_payload(payload: Value) -> Result<Self, SchemaError> {
        if !payload.is_object() {
            debug!(record = Self::RECORD, "rejected non-object payload");
            return Err(SchemaError::NotAnObject {
                record: Self::RECORD,
            });
        }

        serde_json::from_value(payload).map_err(|source| {
            debug!(record = Self::RECORD, error = %source, "rejected payload");
            SchemaError::Invalid {
                record: Self::RECORD,
                source,
            }
        })
    }

    /// Parse a raw JSON document and decode it.
    fn from_json(raw: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(raw).map_err(|source| SchemaError::Invalid {
            record: Self::RECORD,
            source,
        })?;
        Self::from_payload(value)
    }
}

impl Payload for Message {
    const RECORD: &'static str = "Message";
}

impl Payload for Conversation {
    const RECORD: &'static str = "Conversation";
}

impl Payload for SendMessageRequest {
    const RECORD: &'static str = "SendMessageRequest";
}

impl Payload for MessageReaction {
    const RECORD: &'static str = "MessageReaction";
}

impl Payload for User {
    const RECORD: &'static str = "User";
}
