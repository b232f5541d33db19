//! Domain entities.

use super::value_object::{ConnectionId, DisplayName, MessageText, Timestamp};

/// One relayed chat message. Immutable once created.
///
/// Messages are ordered by arrival at the relay; `sent_at` is the
/// client-asserted send time and is display metadata only.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Self-asserted name of the sender
    pub sender_name: DisplayName,
    /// Message body
    pub text: MessageText,
    /// Client-asserted send time (epoch millis)
    pub sent_at: Timestamp,
    /// Connection the message arrived on
    pub sender_connection_id: ConnectionId,
}

impl ChatMessage {
    pub fn new(
        sender_name: DisplayName,
        text: MessageText,
        sent_at: Timestamp,
        sender_connection_id: ConnectionId,
    ) -> Self {
        Self {
            sender_name,
            text,
            sent_at,
            sender_connection_id,
        }
    }
}

/// A transient "seen" receipt.
///
/// Broadcast once to every other connection and never stored; each client
/// holds it only long enough to decide whether to render a seen indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct SeenReceipt {
    /// Name of the participant who viewed the messages
    pub name: DisplayName,
    /// Viewed-at time (client-asserted, server now when absent)
    pub timestamp: Timestamp,
    /// Connection the receipt arrived on
    pub viewer_connection_id: ConnectionId,
}
