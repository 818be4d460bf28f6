//! UseCase: ルーム退出

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, RegistryError, RoomId};

use super::error::LeaveRoomError;

/// ルーム退出のユースケース（応答は不要）
pub struct LeaveRoomUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl LeaveRoomUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// ルームから退出する。参加していなければ何もしない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Result<(), LeaveRoomError> {
        match self.registry.leave(connection_id, room_id).await {
            Ok(was_member) => {
                tracing::info!(%connection_id, %room_id, was_member, "Left room");
                Ok(())
            }
            Err(RegistryError::ConnectionNotFound(_)) => Err(LeaveRoomError::NotRegistered),
            Err(e) => {
                tracing::error!(%connection_id, "Unexpected registry error on leave: {}", e);
                Err(LeaveRoomError::NotRegistered)
            }
        }
    }
}
