//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 入力の矯正（trim・切り詰め）、履歴への追加、永続化の起動
//!
//! ### なぜこのテストが必要か
//! - 空本文のメッセージが履歴にもブロードキャストにも現れないことを保証
//! - 350文字・24文字の切り詰めが保存前に行われることを保証
//! - 永続化が任意機能であり、未設定でも送信が機能することを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: メッセージ送信と履歴への追加（ストアあり・なし）
//! - 異常系: 空・空白のみの本文、ストアの書き込み失敗
//! - エッジケース: クライアントのタイムスタンプ欠落

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ConnectionId, DisplayName, HistoryBuffer, MessagePusher, MessageStore,
    MessageText, Timestamp,
};
use kotatsu_shared::time::now_millis;

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    history: Arc<Mutex<HistoryBuffer>>,
    /// MessagePusher（メッセージ配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// MessageStore（永続化の抽象化、設定がなければ None）
    store: Option<Arc<dyn MessageStore>>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        history: Arc<Mutex<HistoryBuffer>>,
        message_pusher: Arc<dyn MessagePusher>,
        store: Option<Arc<dyn MessageStore>>,
    ) -> Self {
        Self {
            history,
            message_pusher,
            store,
        }
    }

    /// メッセージ送信を実行
    ///
    /// 本文と表示名を矯正し、履歴へ追加した上で、永続化をベストエフォートで
    /// 起動する。永続化の完了は待たず、失敗は警告ログに記録されるのみで
    /// 配信経路には影響しない。
    ///
    /// 登録済みかどうかは問わない。メッセージイベントは表示名を自身で
    /// 運ぶため、登録との競合を許容する。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信元の接続 ID
    /// * `raw_name` - クライアントが申告した表示名（未検証）
    /// * `raw_text` - メッセージ本文（未検証）
    /// * `client_timestamp` - クライアント申告の送信時刻（数値でなければ None）
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 受理されたメッセージ（ブロードキャスト用）
    /// * `Err(SendMessageError::EmptyText)` - 矯正後の本文が空（破棄）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        raw_name: &str,
        raw_text: &str,
        client_timestamp: Option<i64>,
    ) -> Result<ChatMessage, SendMessageError> {
        let text = MessageText::coerce(raw_text);
        if text.is_empty() {
            return Err(SendMessageError::EmptyText);
        }
        let name = DisplayName::coerce(raw_name);

        // 表示用の送信時刻はクライアント申告値を優先し、欠落・非数値なら
        // サーバー時刻で補う。履歴と保存の順序は常に到着順が正。
        let sent_at = Timestamp::new(client_timestamp.unwrap_or_else(now_millis));

        let message = ChatMessage::new(name, text, sent_at, connection_id);

        // 1. 履歴バッファへ追加（容量超過時は最古を退避）
        self.history.lock().await.append(message.clone());

        // 2. 永続化をベストエフォートで起動（fire-and-forget）
        if let Some(store) = &self.store {
            let store = Arc::clone(store);
            let to_persist = message.clone();
            tokio::spawn(async move {
                if let Err(e) = store.append(&to_persist).await {
                    tracing::warn!("Failed to persist message: {}", e);
                }
            });
        }

        Ok(message)
    }

    /// 受理したメッセージを全接続（送信者を含む）へブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_message(&self, message: &str) {
        self.message_pusher.broadcast_all(message).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockMessageStore;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string())
    }

    fn new_usecase(
        store: Option<Arc<dyn MessageStore>>,
    ) -> (SendMessageUseCase, Arc<Mutex<HistoryBuffer>>) {
        let history = Arc::new(Mutex::new(HistoryBuffer::new()));
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = SendMessageUseCase::new(history.clone(), message_pusher, store);
        (usecase, history)
    }

    #[tokio::test]
    async fn test_send_message_success_without_store() {
        // テスト項目: ストア未設定でもメッセージが受理され履歴に追加される
        // given (前提条件):
        let (usecase, history) = new_usecase(None);

        // when (操作):
        let result = usecase
            .execute(conn("c1"), "alice", "Hello!", Some(1234))
            .await;

        // then (期待する結果):
        let message = result.unwrap();
        assert_eq!(message.sender_name.as_str(), "alice");
        assert_eq!(message.text.as_str(), "Hello!");
        assert_eq!(message.sent_at.value(), 1234);
        assert_eq!(history.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_send_message_empty_text_is_dropped() {
        // テスト項目: 空白のみの本文は EmptyText で破棄され、履歴に現れない
        // given (前提条件):
        let (usecase, history) = new_usecase(None);

        // when (操作):
        let result = usecase.execute(conn("c1"), "alice", "   \n ", None).await;

        // then (期待する結果):
        assert_eq!(result, Err(SendMessageError::EmptyText));
        assert!(history.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_truncates_text_to_350_chars() {
        // テスト項目: 350文字を超える本文がちょうど350文字に切り詰められる
        // given (前提条件):
        let (usecase, history) = new_usecase(None);
        let long_text = "y".repeat(500);

        // when (操作):
        let message = usecase
            .execute(conn("c1"), "alice", &long_text, None)
            .await
            .unwrap();

        // then (期待する結果): 保存もブロードキャスト用の値も切り詰め済み
        assert_eq!(message.text.as_str().chars().count(), 350);
        let snapshot = history.lock().await.snapshot();
        assert_eq!(snapshot[0].text.as_str().chars().count(), 350);
    }

    #[tokio::test]
    async fn test_send_message_truncates_name_to_24_chars() {
        // テスト項目: 24文字を超える表示名が24文字に切り詰められる
        // given (前提条件):
        let (usecase, _history) = new_usecase(None);
        let long_name = "z".repeat(30);

        // when (操作):
        let message = usecase
            .execute(conn("c1"), &long_name, "hi", None)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(message.sender_name.as_str().chars().count(), 24);
    }

    #[tokio::test]
    async fn test_send_message_falls_back_to_server_time() {
        // テスト項目: クライアントのタイムスタンプ欠落時はサーバー時刻で補われる
        // given (前提条件):
        let (usecase, _history) = new_usecase(None);
        let before = now_millis();

        // when (操作):
        let message = usecase
            .execute(conn("c1"), "alice", "hi", None)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(message.sent_at.value() >= before);
    }

    #[tokio::test]
    async fn test_send_message_forwards_to_store() {
        // テスト項目: 受理されたメッセージがストアへ転送される
        // given (前提条件):
        let mut mock_store = MockMessageStore::new();
        mock_store.expect_append().times(1).returning(|_| Ok(()));
        let (usecase, _history) = new_usecase(Some(Arc::new(mock_store)));

        // when (操作):
        usecase
            .execute(conn("c1"), "alice", "persist me", None)
            .await
            .unwrap();

        // spawn されたタスクを走らせる
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        // then (期待する結果): モックの期待（times(1)）が drop 時に検証される
    }

    #[tokio::test]
    async fn test_dropped_message_never_reaches_store() {
        // テスト項目: 破棄されたメッセージはストアへ転送されない
        // given (前提条件):
        let mut mock_store = MockMessageStore::new();
        mock_store.expect_append().times(0);
        let (usecase, _history) = new_usecase(Some(Arc::new(mock_store)));

        // when (操作):
        let result = usecase.execute(conn("c1"), "alice", "  ", None).await;

        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        // then (期待する結果):
        assert_eq!(result, Err(SendMessageError::EmptyText));
    }

    #[tokio::test]
    async fn test_store_failure_does_not_fail_send() {
        // テスト項目: ストアの書き込み失敗が送信の成否に影響しない
        // given (前提条件):
        let mut mock_store = MockMessageStore::new();
        mock_store
            .expect_append()
            .times(1)
            .returning(|_| Err(crate::domain::StoreError::Request("boom".to_string())));
        let (usecase, history) = new_usecase(Some(Arc::new(mock_store)));

        // when (操作):
        let result = usecase.execute(conn("c1"), "alice", "hi", None).await;

        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        // then (期待する結果): 送信は成功し、履歴にも追加されている
        assert!(result.is_ok());
        assert_eq!(history.lock().await.len(), 1);
    }
}
