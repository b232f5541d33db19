//! UseCase: タイピング状態更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - TypingUseCase::execute() メソッド
//! - タイピング開始・終了による TypingTracker の更新とスナップショット構築
//!
//! ### なぜこのテストが必要か
//! - 同じ停止イベントを2回送っても状態が変わらない（冪等）ことを保証
//! - 未登録の接続でもタイピングを通知できることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: 開始 → スナップショットに現れる、停止 → 消える
//! - エッジケース: 停止イベントの重複、複数接続の同時タイピング

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, DisplayName, MessagePusher, TypingEntry, TypingTracker};

/// タイピング状態更新のユースケース
pub struct TypingUseCase {
    typing: Arc<Mutex<TypingTracker>>,
    /// MessagePusher（メッセージ配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl TypingUseCase {
    /// 新しい TypingUseCase を作成
    pub fn new(typing: Arc<Mutex<TypingTracker>>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            typing,
            message_pusher,
        }
    }

    /// タイピング状態の更新を実行
    ///
    /// 停止までのタイムアウトはクライアント側の責務であり、ここでは
    /// フラグの通りに更新するだけ。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 対象の接続 ID
    /// * `raw_name` - クライアントが申告した表示名（未検証）
    /// * `is_typing` - true で開始、false で終了
    ///
    /// # Returns
    ///
    /// 更新後のスナップショット（ブロードキャスト用、挿入順）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        raw_name: &str,
        is_typing: bool,
    ) -> Vec<TypingEntry> {
        let mut tracker = self.typing.lock().await;
        if is_typing {
            tracker.set(connection_id, DisplayName::coerce(raw_name));
        } else {
            tracker.clear(&connection_id);
        }
        tracker.snapshot()
    }

    /// タイピングのスナップショットを全接続へブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_typing(&self, message: &str) {
        self.message_pusher.broadcast_all(message).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;

    fn new_usecase() -> TypingUseCase {
        let typing = Arc::new(Mutex::new(TypingTracker::new()));
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        TypingUseCase::new(typing, message_pusher)
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string())
    }

    #[tokio::test]
    async fn test_typing_start_appears_in_snapshot() {
        // テスト項目: タイピング開始でスナップショットにエントリが現れる
        // given (前提条件):
        let usecase = new_usecase();

        // when (操作):
        let snapshot = usecase.execute(conn("c1"), "Bob", true).await;

        // then (期待する結果):
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name.as_str(), "Bob");
        assert_eq!(snapshot[0].connection_id, conn("c1"));
    }

    #[tokio::test]
    async fn test_typing_stop_removes_entry() {
        // テスト項目: タイピング終了でエントリが消える
        // given (前提条件):
        let usecase = new_usecase();
        usecase.execute(conn("c1"), "Bob", true).await;

        // when (操作):
        let snapshot = usecase.execute(conn("c1"), "Bob", false).await;

        // then (期待する結果):
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_typing_stop_twice_is_idempotent() {
        // テスト項目: 同じ停止イベントを2回送っても1回と同じ状態になる
        // given (前提条件):
        let usecase = new_usecase();
        usecase.execute(conn("c1"), "Bob", true).await;

        // when (操作):
        let after_first = usecase.execute(conn("c1"), "Bob", false).await;
        let after_second = usecase.execute(conn("c1"), "Bob", false).await;

        // then (期待する結果):
        assert!(after_first.is_empty());
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn test_multiple_connections_typing_in_insertion_order() {
        // テスト項目: 複数接続のタイピングが挿入順でスナップショットに並ぶ
        // given (前提条件):
        let usecase = new_usecase();

        // when (操作):
        usecase.execute(conn("c2"), "Bob", true).await;
        let snapshot = usecase.execute(conn("c1"), "Alice", true).await;

        // then (期待する結果):
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].name.as_str(), "Bob");
        assert_eq!(snapshot[1].name.as_str(), "Alice");
    }
}
