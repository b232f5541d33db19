//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged with a `type` field. Server→client
//! frames are the structs below; client→server frames deserialize into
//! [`ClientEvent`], whose fields use the lenient deserializers so a
//! missing or wrong-typed field defaults instead of rejecting the event.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::lenient;

/// Event type tag shared by all server→client frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    History,
    Presence,
    Typing,
    LastSeen,
    Message,
    Seen,
}

/// One message as it appears inside a history snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDto {
    pub name: String,
    pub text: String,
    pub sent_at: i64,
    pub connection_id: String,
}

/// History snapshot, sent once per connection on connect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub r#type: MessageType,
    /// Oldest first
    pub messages: Vec<MessageDto>,
}

/// Presence update, sent on every registration and disconnect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceMessage {
    pub r#type: MessageType,
    /// Raw transport-level connection count
    pub connection_count: usize,
    /// Distinct registered names, sorted
    pub names: Vec<String>,
}

/// One entry of a typing snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingEntryDto {
    pub connection_id: String,
    pub name: String,
}

/// Typing snapshot, sent on every typing change and disconnect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingMessage {
    pub r#type: MessageType,
    /// Insertion order
    pub entries: Vec<TypingEntryDto>,
}

/// Last-seen ledger snapshot, sent on connect and every disconnect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastSeenMessage {
    pub r#type: MessageType,
    /// Display name → last disconnect time (epoch millis)
    pub seen: HashMap<String, i64>,
}

/// A newly accepted chat message, broadcast to all connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub r#type: MessageType,
    pub name: String,
    pub text: String,
    pub sent_at: i64,
    pub connection_id: String,
}

/// A seen receipt, broadcast to every connection except the viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenMessage {
    pub r#type: MessageType,
    pub name: String,
    pub timestamp: i64,
    pub viewer_connection_id: String,
}

/// Inbound client event.
///
/// An unknown `type` or a frame that is not a JSON object fails to parse and
/// the gateway drops it; recognized events always parse, with missing or
/// wrong-typed fields coerced to defaults. `Serialize` exists for the CLI
/// client, which emits these frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Register {
        #[serde(default, deserialize_with = "lenient::string")]
        name: String,
    },
    Message {
        #[serde(default, deserialize_with = "lenient::string")]
        name: String,
        #[serde(default, deserialize_with = "lenient::string")]
        text: String,
        #[serde(default, deserialize_with = "lenient::opt_millis")]
        timestamp: Option<i64>,
    },
    Typing {
        #[serde(default, deserialize_with = "lenient::string")]
        name: String,
        #[serde(default, deserialize_with = "lenient::flag")]
        typing: bool,
    },
    Seen {
        #[serde(default, deserialize_with = "lenient::string")]
        name: String,
        #[serde(default, deserialize_with = "lenient::opt_millis")]
        timestamp: Option<i64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_register_parses() {
        // テスト項目: register イベントが正しくパースされる
        // given (前提条件):
        let json = r#"{"type":"register","name":"Alice"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Register {
                name: "Alice".to_string()
            }
        );
    }

    #[test]
    fn test_client_event_message_without_timestamp() {
        // テスト項目: timestamp 欠落の message イベントが None でパースされる
        // given (前提条件):
        let json = r#"{"type":"message","name":"Alice","text":"hi"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Message {
                name: "Alice".to_string(),
                text: "hi".to_string(),
                timestamp: None,
            }
        );
    }

    #[test]
    fn test_client_event_missing_fields_default() {
        // テスト項目: フィールドが全て欠落していてもイベント自体は受理される
        // given (前提条件):
        let json = r#"{"type":"typing"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果): name は空、typing は false
        assert_eq!(
            event,
            ClientEvent::Typing {
                name: String::new(),
                typing: false,
            }
        );
    }

    #[test]
    fn test_client_event_unknown_type_is_rejected() {
        // テスト項目: 未知の type を持つイベントはパースに失敗する（破棄対象）
        // given (前提条件):
        let json = r#"{"type":"shout","name":"Alice"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_message_type_serializes_snake_case() {
        // テスト項目: type タグが snake_case で直列化される
        // given (前提条件):
        let message = LastSeenMessage {
            r#type: MessageType::LastSeen,
            seen: HashMap::new(),
        };

        // when (操作):
        let json = serde_json::to_string(&message).unwrap();

        // then (期待する結果):
        assert!(json.contains(r#""type":"last_seen""#));
    }
}
