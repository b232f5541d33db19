//! UseCase: 接続受付処理
//!
//! 新しい接続を配信対象として登録し、その接続へ送る初期スナップショット
//! （履歴・最終確認時刻の台帳・プレゼンス・タイピング状態）を構築する。
//!
//! 接続直後のクライアントは未登録状態であり、登録イベントを送るまで
//! SessionRegistry には現れない。それでも接続数（connection_count）には
//! 含まれる。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ConnectionId, HistoryBuffer, LastSeenLedger, MessagePusher, PresenceSnapshot,
    PusherChannel, SessionRegistry, TypingEntry, TypingTracker,
};

/// 接続直後にクライアントへ送る初期状態のスナップショット
#[derive(Debug)]
pub struct InitialSnapshot {
    /// 履歴バッファの内容（古い順）
    pub history: Vec<ChatMessage>,
    /// 最終確認時刻の台帳（名前 → epoch millis）
    pub last_seen: HashMap<String, i64>,
    /// 現在のプレゼンス
    pub presence: PresenceSnapshot,
    /// 現在タイピング中の接続（挿入順）
    pub typing: Vec<TypingEntry>,
}

/// 接続受付のユースケース
pub struct ConnectUseCase {
    history: Arc<Mutex<HistoryBuffer>>,
    sessions: Arc<Mutex<SessionRegistry>>,
    typing: Arc<Mutex<TypingTracker>>,
    last_seen: Arc<Mutex<LastSeenLedger>>,
    /// MessagePusher（メッセージ配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectUseCase {
    /// 新しい ConnectUseCase を作成
    pub fn new(
        history: Arc<Mutex<HistoryBuffer>>,
        sessions: Arc<Mutex<SessionRegistry>>,
        typing: Arc<Mutex<TypingTracker>>,
        last_seen: Arc<Mutex<LastSeenLedger>>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            history,
            sessions,
            typing,
            last_seen,
            message_pusher,
        }
    }

    /// 接続受付を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - サーバーが採番した接続 ID
    /// * `sender` - この接続へメッセージを届けるチャンネル
    ///
    /// # Returns
    ///
    /// この接続へ送る初期スナップショット
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> InitialSnapshot {
        // 1. 配信対象として登録（以降のブロードキャストに含まれる）
        self.message_pusher
            .register_connection(connection_id, sender)
            .await;

        // 2. 初期スナップショットを構築
        let history = self.history.lock().await.snapshot();
        let last_seen = self.last_seen.lock().await.as_map();
        let presence = PresenceSnapshot {
            connection_count: self.message_pusher.connection_count().await,
            names: self.sessions.lock().await.names(),
        };
        let typing = self.typing.lock().await.snapshot();

        InitialSnapshot {
            history,
            last_seen,
            presence,
            typing,
        }
    }
}
