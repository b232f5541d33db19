//! Conversion logic between DTOs and domain types.

use crate::domain::{ChatMessage, PresenceSnapshot, SeenReceipt, TypingEntry};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain → DTO
// ========================================

impl From<ChatMessage> for dto::MessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            name: model.sender_name.into_string(),
            text: model.text.into_string(),
            sent_at: model.sent_at.value(),
            connection_id: model.sender_connection_id.into_string(),
        }
    }
}

impl From<ChatMessage> for dto::ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            r#type: dto::MessageType::Message,
            name: model.sender_name.into_string(),
            text: model.text.into_string(),
            sent_at: model.sent_at.value(),
            connection_id: model.sender_connection_id.into_string(),
        }
    }
}

impl From<Vec<ChatMessage>> for dto::HistoryMessage {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self {
            r#type: dto::MessageType::History,
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PresenceSnapshot> for dto::PresenceMessage {
    fn from(model: PresenceSnapshot) -> Self {
        Self {
            r#type: dto::MessageType::Presence,
            connection_count: model.connection_count,
            names: model.names,
        }
    }
}

impl From<TypingEntry> for dto::TypingEntryDto {
    fn from(model: TypingEntry) -> Self {
        Self {
            connection_id: model.connection_id.into_string(),
            name: model.name.into_string(),
        }
    }
}

impl From<Vec<TypingEntry>> for dto::TypingMessage {
    fn from(entries: Vec<TypingEntry>) -> Self {
        Self {
            r#type: dto::MessageType::Typing,
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<std::collections::HashMap<String, i64>> for dto::LastSeenMessage {
    fn from(seen: std::collections::HashMap<String, i64>) -> Self {
        Self {
            r#type: dto::MessageType::LastSeen,
            seen,
        }
    }
}

impl From<SeenReceipt> for dto::SeenMessage {
    fn from(model: SeenReceipt) -> Self {
        Self {
            r#type: dto::MessageType::Seen,
            name: model.name.into_string(),
            timestamp: model.timestamp.value(),
            viewer_connection_id: model.viewer_connection_id.into_string(),
        }
    }
}
