//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RegistryError;

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("failed to register connection: {0}")]
    Registry(#[from] RegistryError),
}

/// ルーム参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("room limit of {limit} per connection exceeded")]
    RoomLimitExceeded { limit: usize },

    #[error("connection is not registered")]
    NotRegistered,
}

impl From<RegistryError> for JoinRoomError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::RoomLimitExceeded { limit } => Self::RoomLimitExceeded { limit },
            RegistryError::AlreadyRegistered(_) | RegistryError::ConnectionNotFound(_) => {
                Self::NotRegistered
            }
        }
    }
}

/// ルーム退出のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveRoomError {
    #[error("connection is not registered")]
    NotRegistered,
}

/// ルームリレーのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// 送信者がレジストリに存在しない（切断処理と競合した場合など）
    #[error("sender is not registered")]
    SenderNotRegistered,

    /// 永続化に失敗した。この場合は誰にも配信しない
    #[error("failed to persist message")]
    StorageFailure,
}
