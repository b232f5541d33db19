//! UseCase: 表示名登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterUseCase::execute() メソッド
//! - 表示名の矯正（trim・24文字切り詰め）と SessionRegistry への登録
//!
//! ### なぜこのテストが必要か
//! - 登録は何度でも上書きできる（冪等）ことを保証
//! - 空の表示名が no-op として拒否されることを保証
//! - 登録時に古いタイピング状態が消えることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: 新規登録、再登録による上書き
//! - 異常系: 空・空白のみの表示名
//! - エッジケース: 登録前にタイピングを始めていた接続

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, MessagePusher, PresenceSnapshot, SessionRegistry, TypingTracker,
};

use super::error::RegisterError;

/// 表示名登録のユースケース
pub struct RegisterUseCase {
    sessions: Arc<Mutex<SessionRegistry>>,
    typing: Arc<Mutex<TypingTracker>>,
    /// MessagePusher（メッセージ配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RegisterUseCase {
    /// 新しい RegisterUseCase を作成
    pub fn new(
        sessions: Arc<Mutex<SessionRegistry>>,
        typing: Arc<Mutex<TypingTracker>>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            sessions,
            typing,
            message_pusher,
        }
    }

    /// 登録を実行
    ///
    /// 接続に表示名を紐付ける。既に登録済みなら上書きし、登録前に残っていた
    /// タイピング状態を消す。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 登録する接続の ID
    /// * `raw_name` - クライアントが申告した表示名（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(PresenceSnapshot)` - 登録後のプレゼンス（ブロードキャスト用）
    /// * `Err(RegisterError::EmptyName)` - 矯正後の表示名が空（no-op）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        raw_name: &str,
    ) -> Result<PresenceSnapshot, RegisterError> {
        let name = DisplayName::coerce(raw_name);
        if name.is_empty() {
            return Err(RegisterError::EmptyName);
        }

        // 1. SessionRegistry へ登録（上書き）
        self.sessions
            .lock()
            .await
            .register(connection_id.clone(), name);

        // 2. 登録前のタイピング状態が残っていれば消す
        self.typing.lock().await.clear(&connection_id);

        // 3. ブロードキャスト用のプレゼンスを構築
        Ok(self.presence_snapshot().await)
    }

    /// 現在のプレゼンスのスナップショットを構築
    pub async fn presence_snapshot(&self) -> PresenceSnapshot {
        PresenceSnapshot {
            connection_count: self.message_pusher.connection_count().await,
            names: self.sessions.lock().await.names(),
        }
    }

    /// プレゼンス更新を全接続へブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_presence(&self, message: &str) {
        self.message_pusher.broadcast_all(message).await;
    }
}
