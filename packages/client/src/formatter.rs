//! Event formatting utilities for client display.

use kotatsu_server::infrastructure::dto::websocket::{
    MessageDto, SeenMessage, TypingEntryDto,
};
use kotatsu_shared::time::timestamp_to_jst_rfc3339;
use std::collections::HashMap;

/// Event formatter for client display
pub struct EventFormatter;

impl EventFormatter {
    /// Format the history snapshot received on connect
    pub fn format_history(messages: &[MessageDto]) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Recent messages:\n");

        if messages.is_empty() {
            output.push_str("(No messages yet)\n");
        } else {
            for message in messages {
                output.push_str(&format!(
                    "@{}: {} ({})\n",
                    message.name,
                    message.text,
                    timestamp_to_jst_rfc3339(message.sent_at)
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a presence update
    pub fn format_presence(connection_count: usize, names: &[String]) -> String {
        let who = if names.is_empty() {
            "(nobody registered)".to_string()
        } else {
            names.join(", ")
        };
        format!(
            "\n* online: {} ({} connection{})\n",
            who,
            connection_count,
            if connection_count == 1 { "" } else { "s" }
        )
    }

    /// Format a typing snapshot
    pub fn format_typing(entries: &[TypingEntryDto]) -> String {
        if entries.is_empty() {
            return "\n* nobody is typing\n".to_string();
        }
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        format!("\n* typing: {}\n", names.join(", "))
    }

    /// Format a last-seen ledger snapshot, sorted by name
    pub fn format_last_seen(seen: &HashMap<String, i64>) -> String {
        if seen.is_empty() {
            return String::new();
        }
        let mut entries: Vec<(&String, &i64)> = seen.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut output = String::from("\n* last seen:\n");
        for (name, millis) in entries {
            output.push_str(&format!(
                "    {} - {}\n",
                name,
                timestamp_to_jst_rfc3339(*millis)
            ));
        }
        output
    }

    /// Format a relayed chat message
    pub fn format_chat_message(from: &str, text: &str, sent_at: i64) -> String {
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            from,
            text,
            timestamp_to_jst_rfc3339(sent_at)
        )
    }

    /// Format a seen receipt from another participant
    pub fn format_seen(receipt: &SeenMessage) -> String {
        format!(
            "\n* {} has seen the messages ({})\n",
            receipt.name,
            timestamp_to_jst_rfc3339(receipt.timestamp)
        )
    }

    /// Format a frame that matched no known event type
    pub fn format_raw_message(text: &str) -> String {
        format!("\n[unrecognized frame] {}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_history_lists_messages_in_order() {
        // テスト項目: 履歴が受信順に整形される
        // given (前提条件):
        let messages = vec![
            MessageDto {
                name: "alice".to_string(),
                text: "first".to_string(),
                sent_at: 1672498800000,
                connection_id: "c1".to_string(),
            },
            MessageDto {
                name: "bob".to_string(),
                text: "second".to_string(),
                sent_at: 1672498860000,
                connection_id: "c2".to_string(),
            },
        ];

        // when (操作):
        let output = EventFormatter::format_history(&messages);

        // then (期待する結果):
        let first = output.find("@alice: first").unwrap();
        let second = output.find("@bob: second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_format_history_empty() {
        // テスト項目: 空の履歴にプレースホルダが表示される
        // given (前提条件):
        let messages = vec![];

        // when (操作):
        let output = EventFormatter::format_history(&messages);

        // then (期待する結果):
        assert!(output.contains("(No messages yet)"));
    }

    #[test]
    fn test_format_presence_pluralizes_connections() {
        // テスト項目: 接続数の単数・複数で表記が変わる
        // given (前提条件):

        // when (操作):
        let one = EventFormatter::format_presence(1, &["alice".to_string()]);
        let two = EventFormatter::format_presence(2, &["alice".to_string()]);

        // then (期待する結果):
        assert!(one.contains("1 connection)"));
        assert!(two.contains("2 connections)"));
    }

    #[test]
    fn test_format_typing_joins_names() {
        // テスト項目: タイピング中の名前がまとめて表示される
        // given (前提条件):
        let entries = vec![
            TypingEntryDto {
                connection_id: "c1".to_string(),
                name: "alice".to_string(),
            },
            TypingEntryDto {
                connection_id: "c2".to_string(),
                name: "bob".to_string(),
            },
        ];

        // when (操作):
        let output = EventFormatter::format_typing(&entries);

        // then (期待する結果):
        assert!(output.contains("typing: alice, bob"));
    }

    #[test]
    fn test_format_last_seen_sorted_by_name() {
        // テスト項目: 最終確認時刻が名前順で表示される
        // given (前提条件):
        let mut seen = HashMap::new();
        seen.insert("bob".to_string(), 1672498800000);
        seen.insert("alice".to_string(), 1672498860000);

        // when (操作):
        let output = EventFormatter::format_last_seen(&seen);

        // then (期待する結果):
        let alice = output.find("alice").unwrap();
        let bob = output.find("bob").unwrap();
        assert!(alice < bob);
    }

    #[test]
    fn test_format_last_seen_empty_is_blank() {
        // テスト項目: 空の台帳は何も表示しない
        // given (前提条件):
        let seen = HashMap::new();

        // when (操作):
        let output = EventFormatter::format_last_seen(&seen);

        // then (期待する結果):
        assert!(output.is_empty());
    }
}
