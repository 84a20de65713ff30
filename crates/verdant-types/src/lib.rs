//! Verdant chat schema.
//!
//! Wire records exchanged between the app and its backend for direct
//! messaging, plus the pure display helpers the UI layer renders from them.
//! Nothing here reads the clock: every time-dependent helper takes `now`.

pub mod api;
pub mod conversations;
pub mod error;
pub mod messages;
pub mod models;
pub mod payload;
pub mod reactions;
pub mod timestamp;

pub use api::{ReactionGroup, SendMessageRequest};
pub use conversations::Conversation;
pub use error::SchemaError;
pub use messages::{ContentCategory, Message, MessageStatus, MessageType};
pub use models::User;
pub use payload::Payload;
pub use reactions::{MessageReaction, group_reactions};
