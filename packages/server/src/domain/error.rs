//! ドメインエラー定義
//!
//! リモートのクライアントにはこれらの詳細を返さず、サーバー側のログにのみ出力します。

use thiserror::Error;

use super::value_object::ConnectionId;

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room id is too long: {actual} chars (max {max})")]
    RoomIdTooLong { actual: usize, max: usize },

    #[error("room id must not contain control characters")]
    RoomIdControlCharacter,

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("message is too long: {actual} chars (max {max})")]
    MessageTooLong { actual: usize, max: usize },
}

/// 認証エラー（接続試行に対して致命的、リトライなし）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no bearer token was presented")]
    Missing,

    #[error("bearer token is invalid")]
    Invalid,
}

/// レジストリの不変条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 同じ接続ハンドルの二重登録（プログラミングエラー）
    #[error("connection {0} is already registered")]
    AlreadyRegistered(ConnectionId),

    #[error("connection {0} is not registered")]
    ConnectionNotFound(ConnectionId),

    /// デプロイ設定による 1 接続あたりのルーム数上限
    #[error("room limit of {limit} per connection exceeded")]
    RoomLimitExceeded { limit: usize },
}

/// 永続化バックエンドのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// 受信フレームのデコードエラー（回復可能、フレームは破棄される）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("invalid field: {0}")]
    InvalidField(#[from] ValueObjectError),
}

/// メッセージ送信（プッシュ）エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection {0} not found")]
    ClientNotFound(ConnectionId),

    #[error("outbound queue of connection {0} is full")]
    QueueFull(ConnectionId),

    #[error("outbound queue of connection {0} is closed")]
    QueueClosed(ConnectionId),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
