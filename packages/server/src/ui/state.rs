//! Server state shared across connection handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectUseCase, DisconnectUseCase, RegisterUseCase, SeenUseCase, SendMessageUseCase,
    TypingUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectUseCase（接続受付のユースケース）
    pub connect_usecase: Arc<ConnectUseCase>,
    /// RegisterUseCase（表示名登録のユースケース）
    pub register_usecase: Arc<RegisterUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// TypingUseCase（タイピング状態更新のユースケース）
    pub typing_usecase: Arc<TypingUseCase>,
    /// SeenUseCase（既読通知のユースケース）
    pub seen_usecase: Arc<SeenUseCase>,
    /// DisconnectUseCase（接続切断のユースケース）
    pub disconnect_usecase: Arc<DisconnectUseCase>,
}
