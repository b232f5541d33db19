//! UseCase: 既読通知処理
//!
//! 既読（seen）イベントは共有状態を一切変更しない。受け取った内容を
//! 矯正し、送信者以外の全接続へそのまま中継するだけの通知である。
//! 各クライアントは受け取ったレシートを一時的に保持し、既読インジケータの
//! 表示判断に使う。リレー側では保存しない。

use std::sync::Arc;

use crate::domain::{ConnectionId, DisplayName, MessagePusher, SeenReceipt, Timestamp};
use kotatsu_shared::time::now_millis;

/// 既読通知のユースケース
pub struct SeenUseCase {
    /// MessagePusher（メッセージ配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SeenUseCase {
    /// 新しい SeenUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 既読レシートを構築
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 申告元の接続 ID
    /// * `raw_name` - クライアントが申告した表示名（未検証）
    /// * `client_timestamp` - クライアント申告の既読時刻（数値でなければ None）
    pub fn execute(
        &self,
        connection_id: ConnectionId,
        raw_name: &str,
        client_timestamp: Option<i64>,
    ) -> SeenReceipt {
        SeenReceipt {
            name: DisplayName::coerce(raw_name),
            timestamp: Timestamp::new(client_timestamp.unwrap_or_else(now_millis)),
            viewer_connection_id: connection_id,
        }
    }

    /// レシートを送信者以外の全接続へブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `viewer` - 除外する接続（レシートの申告元）
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_to_others(&self, viewer: &ConnectionId, message: &str) {
        self.message_pusher.broadcast_except(viewer, message).await;
    }
}
