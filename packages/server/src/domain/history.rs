//! Bounded in-memory message history.

use std::collections::VecDeque;

use super::entity::ChatMessage;

/// Number of messages retained in memory and served to new connections
pub const HISTORY_CAPACITY: usize = 120;

/// Bounded, ordered buffer of recent messages.
///
/// Single source of truth for the "recent history" snapshot sent to every
/// new connection. Insertion order is arrival order; once at capacity the
/// oldest entry is evicted (FIFO).
#[derive(Debug)]
pub struct HistoryBuffer {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create an empty buffer with an explicit capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, evicting the oldest entry once at capacity
    pub fn append(&mut self, message: ChatMessage) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    /// Replace the contents wholesale (startup reload from the durable store).
    ///
    /// `messages` is expected oldest-first; if it exceeds capacity only the
    /// most recent entries are kept.
    pub fn reload(&mut self, messages: Vec<ChatMessage>) {
        let skip = messages.len().saturating_sub(self.capacity);
        self.messages = messages.into_iter().skip(skip).collect();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, DisplayName, MessageText, Timestamp};

    fn test_message(text: &str) -> ChatMessage {
        ChatMessage::new(
            DisplayName::coerce("alice"),
            MessageText::coerce(text),
            Timestamp::new(1000),
            ConnectionId::new("conn-1".to_string()),
        )
    }

    #[test]
    fn test_append_keeps_arrival_order() {
        // テスト項目: メッセージが到着順で保持される
        // given (前提条件):
        let mut buffer = HistoryBuffer::new();

        // when (操作):
        buffer.append(test_message("first"));
        buffer.append(test_message("second"));
        buffer.append(test_message("third"));

        // then (期待する結果):
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].text.as_str(), "first");
        assert_eq!(snapshot[1].text.as_str(), "second");
        assert_eq!(snapshot[2].text.as_str(), "third");
    }

    #[test]
    fn test_append_beyond_capacity_evicts_oldest() {
        // テスト項目: 容量 N を超えて追加すると最古のエントリから退避され、
        //            スナップショットは直近 N 件を到着順で保持する
        // given (前提条件):
        let capacity = 5;
        let extra = 3;
        let mut buffer = HistoryBuffer::with_capacity(capacity);

        // when (操作): N + k 件を追加
        for i in 0..capacity + extra {
            buffer.append(test_message(&format!("msg-{}", i)));
        }

        // then (期待する結果): 長さは N 以下、内容は最後の N 件
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), capacity);
        for (offset, message) in snapshot.iter().enumerate() {
            assert_eq!(message.text.as_str(), format!("msg-{}", extra + offset));
        }
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        // テスト項目: どの時点でも長さが容量を超えない
        // given (前提条件):
        let capacity = 4;
        let mut buffer = HistoryBuffer::with_capacity(capacity);

        // when (操作) / then (期待する結果):
        for i in 0..20 {
            buffer.append(test_message(&format!("msg-{}", i)));
            assert!(buffer.len() <= capacity);
        }
    }

    #[test]
    fn test_reload_replaces_contents() {
        // テスト項目: reload が既存の内容を丸ごと置き換える
        // given (前提条件):
        let mut buffer = HistoryBuffer::new();
        buffer.append(test_message("stale"));

        // when (操作):
        buffer.reload(vec![test_message("loaded-1"), test_message("loaded-2")]);

        // then (期待する結果):
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].text.as_str(), "loaded-1");
        assert_eq!(snapshot[1].text.as_str(), "loaded-2");
    }

    #[test]
    fn test_reload_caps_at_capacity_keeping_most_recent() {
        // テスト項目: 容量を超える reload では直近の分だけが保持される
        // given (前提条件):
        let mut buffer = HistoryBuffer::with_capacity(3);
        let messages: Vec<ChatMessage> =
            (0..5).map(|i| test_message(&format!("msg-{}", i))).collect();

        // when (操作):
        buffer.reload(messages);

        // then (期待する結果): 最後の3件が残る
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].text.as_str(), "msg-2");
        assert_eq!(snapshot[2].text.as_str(), "msg-4");
    }

    #[test]
    fn test_new_buffer_is_empty() {
        // テスト項目: 新規作成されたバッファは空である
        // given (前提条件):

        // when (操作):
        let buffer = HistoryBuffer::new();

        // then (期待する結果):
        assert!(buffer.is_empty());
        assert_eq!(buffer.snapshot().len(), 0);
    }
}
