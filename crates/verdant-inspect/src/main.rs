use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use verdant_types::{Conversation, Message, Payload};

/// Records read from one input document, still undecoded.
#[derive(Debug)]
enum Batch {
    Conversations(Vec<Value>),
    Messages(Vec<Value>),
    /// Bare array; each record's kind is guessed from its keys.
    Mixed(Vec<Value>),
}

fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verdant=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Config
    let input: PathBuf = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VERDANT_INPUT").ok())
        .context("usage: verdant-inspect <records.json> (or set VERDANT_INPUT)")?
        .into();
    let now = match std::env::var("VERDANT_NOW") {
        Ok(raw) => parse_now(&raw)?,
        Err(_) => Utc::now(),
    };

    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let doc: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;
    let batch = split_document(doc)?;

    info!("Inspecting {} as of {}", input.display(), now.to_rfc3339());

    let (lines, failed) = render_batch(batch, now);
    for line in &lines {
        println!("{}", line);
    }

    if failed > 0 {
        bail!("{} record(s) failed schema validation", failed);
    }
    Ok(())
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("VERDANT_NOW is not an RFC 3339 timestamp: '{}'", raw))
}

fn split_document(doc: Value) -> Result<Batch> {
    match doc {
        Value::Array(items) => Ok(Batch::Mixed(items)),
        Value::Object(mut obj) => {
            if let Some(Value::Array(items)) = obj.remove("conversations") {
                Ok(Batch::Conversations(items))
            } else if let Some(Value::Array(items)) = obj.remove("messages") {
                Ok(Batch::Messages(items))
            } else {
                bail!("expected an array or an object with a \"conversations\" or \"messages\" array")
            }
        }
        _ => bail!("expected an array or an object at the top level"),
    }
}

fn looks_like_message(record: &Value) -> bool {
    record.get("senderId").is_some()
}

/// Decode and render every record. Returns the printable lines and the number
/// of records that were rejected.
fn render_batch(batch: Batch, now: DateTime<Utc>) -> (Vec<String>, usize) {
    let records: Vec<(bool, Value)> = match batch {
        Batch::Conversations(items) => items.into_iter().map(|v| (false, v)).collect(),
        Batch::Messages(items) => items.into_iter().map(|v| (true, v)).collect(),
        Batch::Mixed(items) => items
            .into_iter()
            .map(|v| (looks_like_message(&v), v))
            .collect(),
    };

    let mut lines = Vec::with_capacity(records.len());
    let mut failed = 0;

    for (idx, (is_message, record)) in records.into_iter().enumerate() {
        let rendered = if is_message {
            Message::from_payload(record).map(|m| render_message(&m, now))
        } else {
            Conversation::from_payload(record).map(|c| render_conversation(&c, now))
        };

        match rendered {
            Ok(line) => lines.push(line),
            Err(e) => {
                warn!(index = idx, record = e.record(), "Skipping record: {}", e);
                failed += 1;
            }
        }
    }

    (lines, failed)
}

fn render_message(msg: &Message, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "{:>8}  {} -> {}  [{}] {}",
        msg.time_ago(now),
        msg.sender_id,
        msg.receiver_id,
        msg.status,
        msg.display_content(now),
    );
    if msg.is_edited {
        line.push_str(" (edited)");
    }
    if msg.is_reply() {
        line.push_str(" (reply)");
    }
    if let Some(left) = msg.time_until_expiry(now).filter(|left| !left.is_zero()) {
        line.push_str(&format!(" (expires in {}m)", left.num_minutes()));
    }
    line
}

fn render_conversation(conv: &Conversation, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "{}{}  {}  {}",
        conv.display_name(),
        if conv.is_online() { " •" } else { "" },
        conv.last_message_preview(now),
        conv.last_message_time(now),
    );
    if conv.has_unread_messages() {
        line.push_str(&format!("  ({} unread)", conv.unread_count));
    }
    if conv.is_muted {
        line.push_str("  [muted]");
    }
    if conv.is_archived {
        line.push_str("  [archived]");
    }
    if conv.is_blocked {
        line.push_str("  [blocked]");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        parse_now("2024-06-20T18:00:00Z").unwrap()
    }

    #[test]
    fn test_parse_now_accepts_offsets() {
        let t = parse_now("2024-06-20T20:00:00+02:00").unwrap();
        assert_eq!(t, now());
        assert!(parse_now("tomorrow").is_err());
    }

    #[test]
    fn test_split_document() {
        assert!(matches!(
            split_document(json!({ "messages": [] })).unwrap(),
            Batch::Messages(_)
        ));
        assert!(matches!(
            split_document(json!({ "conversations": [] })).unwrap(),
            Batch::Conversations(_)
        ));
        assert!(matches!(split_document(json!([])).unwrap(), Batch::Mixed(_)));
        assert!(split_document(json!({ "users": [] })).is_err());
        assert!(split_document(json!("nope")).is_err());
    }

    #[test]
    fn test_render_mixed_batch_counts_failures() {
        let batch = split_document(json!([
            {
                "id": "m-1",
                "senderId": "u-bob",
                "receiverId": "u-alice",
                "content": "",
                "type": "image",
                "status": "read",
                "createdAt": "2024-06-20T17:30:00Z"
            },
            {
                "id": "c-1",
                "userId": "u-alice",
                "otherUserId": "u-bob",
                "unreadCount": 2
            },
            {
                "senderId": "u-bob",
                "receiverId": "u-alice",
                "content": "missing id",
                "createdAt": "2024-06-20T17:30:00Z"
            }
        ]))
        .unwrap();

        let (lines, failed) = render_batch(batch, now());
        assert_eq!(failed, 1);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "     30m  u-bob -> u-alice  [read] 📷 Photo");
        assert_eq!(lines[1], "Unknown User  No messages yet    (2 unread)");
    }

    #[test]
    fn test_render_message_flags() {
        let msg = Message::from_payload(json!({
            "id": "m-2",
            "senderId": "u-alice",
            "receiverId": "u-bob",
            "content": "repot in spring",
            "status": "sent",
            "isEdited": true,
            "replyToMessageId": "m-1",
            "expiresAt": "2024-06-20T18:45:00Z",
            "createdAt": "2024-06-20T17:59:30Z"
        }))
        .unwrap();

        assert_eq!(
            render_message(&msg, now()),
            "Just now  u-alice -> u-bob  [sent] repot in spring (edited) (reply) (expires in 45m)"
        );
    }
}
