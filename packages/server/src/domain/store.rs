//! MessageStore trait 定義
//!
//! ドメイン層が必要とする永続化のインターフェースを定義します。
//! 具体的な実装（Firestore）は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 永続化は任意機能であり、起動時に設定から選択される
//! （`Option<Arc<dyn MessageStore>>`）。リレーの動作要件ではないため、
//! `append` の失敗は呼び出し側でログに記録されるのみで、配信経路を
//! ブロックしたり失敗させたりすることはない。

use async_trait::async_trait;
use thiserror::Error;

use super::entity::ChatMessage;

/// 永続化層のエラー
#[derive(Debug, Error)]
pub enum StoreError {
    /// 認証トークンの取得に失敗した
    #[error("Failed to obtain access token: {0}")]
    Auth(String),

    /// ストアへのリクエストに失敗した
    #[error("Store request failed: {0}")]
    Request(String),

    /// ストアの応答を解釈できなかった
    #[error("Unexpected store response: {0}")]
    Response(String),
}

/// MessageStore trait
///
/// メッセージ履歴の追記保存と、起動時の読み出しを抽象化する。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを1件追記する（ベストエフォート）
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError>;

    /// 保存時刻の昇順で直近 `limit` 件を読み出す（起動時に1回だけ使用）
    async fn load_recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;
}
