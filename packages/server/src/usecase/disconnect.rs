//! UseCase: 接続切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - 切断時の登録解除・タイピング状態の除去・最終確認時刻の記録
//!
//! ### なぜこのテストが必要か
//! - 切断後のスナップショットに当該接続が残らないことを保証
//! - 登録済みの接続だけが台帳に記録されることを保証
//! - 台帳の記録時刻が切断時刻以降であることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: 登録済み接続の切断と各スナップショットの更新
//! - エッジケース: 未登録のまま切断した接続（台帳は更新されない）
//! - エッジケース: 同名の別接続が残っている場合の切断

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, LastSeenLedger, MessagePusher, PresenceSnapshot, SessionRegistry, TypingEntry,
    TypingTracker,
};
use kotatsu_shared::time::now_millis;

/// 切断処理の結果（ブロードキャスト用のスナップショット一式）
#[derive(Debug)]
pub struct DisconnectOutcome {
    /// 更新後の台帳。接続が登録済みだった場合のみ Some
    pub last_seen: Option<HashMap<String, i64>>,
    /// 更新後のプレゼンス
    pub presence: PresenceSnapshot,
    /// 更新後のタイピング状態
    pub typing: Vec<TypingEntry>,
}

/// 接続切断のユースケース
pub struct DisconnectUseCase {
    sessions: Arc<Mutex<SessionRegistry>>,
    typing: Arc<Mutex<TypingTracker>>,
    last_seen: Arc<Mutex<LastSeenLedger>>,
    /// MessagePusher（メッセージ配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(
        sessions: Arc<Mutex<SessionRegistry>>,
        typing: Arc<Mutex<TypingTracker>>,
        last_seen: Arc<Mutex<LastSeenLedger>>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            sessions,
            typing,
            last_seen,
            message_pusher,
        }
    }

    /// 切断処理を実行
    ///
    /// 配信対象から外し、登録済みであれば最終確認時刻をサーバー時刻で記録
    /// した上で、残りの接続へ送る各スナップショットを構築する。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 切断した接続の ID
    pub async fn execute(&self, connection_id: ConnectionId) -> DisconnectOutcome {
        // 1. 配信対象から外す（以降のブロードキャストに含まれない）
        self.message_pusher
            .unregister_connection(&connection_id)
            .await;

        // 2. 登録済みなら台帳を更新
        let removed_name = self.sessions.lock().await.remove(&connection_id);
        let last_seen = match removed_name {
            Some(name) => {
                let mut ledger = self.last_seen.lock().await;
                ledger.record(&name, now_millis());
                Some(ledger.as_map())
            }
            None => None,
        };

        // 3. タイピング状態を除去（冪等）
        self.typing.lock().await.clear(&connection_id);

        // 4. 残りの接続へ送るスナップショットを構築
        let presence = PresenceSnapshot {
            connection_count: self.message_pusher.connection_count().await,
            names: self.sessions.lock().await.names(),
        };
        let typing = self.typing.lock().await.snapshot();

        DisconnectOutcome {
            last_seen,
            presence,
            typing,
        }
    }

    /// 残りの全接続へブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast(&self, message: &str) {
        self.message_pusher.broadcast_all(message).await;
    }
}
