//! UseCase: ルーム参加

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, MessagePusher, RoomId, ServerEvent};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// ルームに参加し、room-joined 通知をキューに積む
    ///
    /// 参加済みのルームへの再参加も成功として通知する（冪等）。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<(), JoinRoomError> {
        let newly_joined = self.registry.join(connection_id, room_id.clone()).await?;
        tracing::info!(
            %connection_id,
            %room_id,
            newly_joined,
            "Joined room"
        );

        if let Err(e) = self
            .message_pusher
            .push_to(connection_id, &ServerEvent::RoomJoined { room_id })
            .await
        {
            tracing::warn!(%connection_id, "Failed to push room-joined notification: {}", e);
        }

        Ok(())
    }
}
