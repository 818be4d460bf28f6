//! クライアントへ通知するイベント

use super::{
    entity::ChatMessage,
    value_object::{RoomId, UserId},
};

/// 送信失敗時にクライアントへ返す汎用メッセージ
pub const SEND_FAILED_MESSAGE: &str = "failed to send message";

/// ルーム数上限超過時にクライアントへ返す汎用メッセージ
pub const ROOM_LIMIT_MESSAGE: &str = "room limit exceeded";

/// サーバーから接続へプッシュされるイベント
///
/// ワイヤ形式への変換は Infrastructure 層の DTO が担当する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// 認証成功
    Connected { user_id: UserId },
    /// ルーム参加の確認
    RoomJoined { room_id: RoomId },
    /// ルームへのファンアウト
    MessageReceived(ChatMessage),
    /// 発信元の接続にのみ返すエラー通知
    Error { message: String },
}

impl ServerEvent {
    pub fn error(message: &str) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }
}
