//! UseCase 層のエラー型定義
//!
//! 不正な入力は基本的に安全な値へ矯正されるため（domain::value_object）、
//! ここに残るのは「矯正後に空になった」場合だけ。どちらのエラーも
//! イベントを黙って破棄する根拠としてハンドラ側で使われ、クライアントへ
//! エラー応答が返ることはない。

use thiserror::Error;

/// 登録処理のエラー
#[derive(Debug, Error, PartialEq)]
pub enum RegisterError {
    /// 矯正後の表示名が空
    #[error("Display name is empty after trimming")]
    EmptyName,
}

/// メッセージ送信処理のエラー
#[derive(Debug, Error, PartialEq)]
pub enum SendMessageError {
    /// 矯正後の本文が空
    #[error("Message text is empty after trimming")]
    EmptyText,
}
