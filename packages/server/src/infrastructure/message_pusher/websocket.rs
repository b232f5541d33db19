//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - 接続へのメッセージ送信（push_to, broadcast_all, broadcast_except）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に
//! 使用します。これにより「WebSocket の生成」と「メッセージの送信」が
//! 分離されます：
//! - UI 層: WebSocket 接続の受付、sender の生成
//! - Infrastructure 層: sender の管理、メッセージ送信
//!
//! ブロードキャストは呼び出し時点の接続集合への同期的なファンアウトで、
//! 個別の送信失敗は警告ログの上スキップされます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection_id.clone(), sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(connection_id) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", connection_id);
            Ok(())
        } else {
            Err(MessagePushError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast_all(&self, content: &str) {
        let connections = self.connections.lock().await;

        for (connection_id, sender) in connections.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!(
                    "Failed to push message to connection '{}': {}",
                    connection_id,
                    e
                );
            }
        }
    }

    async fn broadcast_except(&self, exclude: &ConnectionId, content: &str) {
        let connections = self.connections.lock().await;

        for (connection_id, sender) in connections.iter() {
            if connection_id == exclude {
                continue;
            }
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!(
                    "Failed to push message to connection '{}': {}",
                    connection_id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string())
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_connection(conn("c1"), tx).await;

        // when (操作):
        let result = pusher.push_to(&conn("c1"), "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_connection_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(&conn("nonexistent"), "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::ConnectionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_all_reaches_every_connection() {
        // テスト項目: broadcast_all が全ての接続（送信者を含む）に届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_connection(conn("c1"), tx1).await;
        pusher.register_connection(conn("c2"), tx2).await;

        // when (操作):
        pusher.broadcast_all("Broadcast message").await;

        // then (期待する結果):
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_all_survives_closed_receiver() {
        // テスト項目: 受信側が閉じた接続があっても他の接続への配信は続く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_connection(conn("dead"), tx1).await;
        pusher.register_connection(conn("alive"), tx2).await;
        drop(rx1); // 受信側を閉じる

        // when (操作):
        pusher.broadcast_all("Broadcast message").await;

        // then (期待する結果): alive には届く
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_except_skips_excluded_connection() {
        // テスト項目: broadcast_except が除外した接続にだけ届かない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_connection(conn("c1"), tx1).await;
        pusher.register_connection(conn("c2"), tx2).await;

        // when (操作):
        pusher.broadcast_except(&conn("c1"), "receipt").await;

        // then (期待する結果):
        assert!(rx1.try_recv().is_err());
        assert_eq!(rx2.recv().await, Some("receipt".to_string()));
    }

    #[tokio::test]
    async fn test_connection_count_tracks_register_and_unregister() {
        // テスト項目: 接続数が登録・登録解除を正しく反映する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作) / then (期待する結果):
        assert_eq!(pusher.connection_count().await, 0);
        pusher.register_connection(conn("c1"), tx1).await;
        pusher.register_connection(conn("c2"), tx2).await;
        assert_eq!(pusher.connection_count().await, 2);
        pusher.unregister_connection(&conn("c1")).await;
        assert_eq!(pusher.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_all_with_no_connections() {
        // テスト項目: 接続が無い状態のブロードキャストでもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作) / then (期待する結果): パニックしない
        pusher.broadcast_all("Message").await;
    }
}
