//! MessagePusher trait 定義
//!
//! ドメイン層が必要とするメッセージ配信のインターフェースを定義します。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// クライアントへメッセージを届けるためのチャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ配信時のエラー
#[derive(Debug, Error, PartialEq)]
pub enum MessagePushError {
    /// 指定されたクライアントが見つからない
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    /// 送信に失敗した
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}

/// MessagePusher trait
///
/// 接続中のクライアントへの配信を抽象化する。UseCase 層はこの trait に
/// 依存し、WebSocket の具体的な実装には依存しない。
///
/// ## 配信の契約
///
/// - ブロードキャストは現時点の接続集合への同期的なファンアウトであり、
///   一部の接続への送信失敗は警告ログの上スキップされる（他の接続への
///   配信を中断しない）
/// - `connection_count` はトランスポート層が把握する生の接続数を返す
///   （登録済みかどうかは問わない）
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録し、配信対象に加える
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を登録解除し、配信対象から外す
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// 現在の生の接続数
    async fn connection_count(&self) -> usize;

    /// 特定の接続へ送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 全ての接続へブロードキャスト（送信者を含む）
    async fn broadcast_all(&self, content: &str);

    /// 指定した接続を除く全ての接続へブロードキャスト
    async fn broadcast_except(&self, exclude: &ConnectionId, content: &str);
}
