//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（有界 `mpsc::Sender`）を管理
//! - イベントをワイヤ形式にシリアライズし、キューに積む（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! キューの生成とソケットへの書き込みは UI 層（`ui/handler/websocket.rs`）が行います。
//! この実装は `try_send` でキューに積むだけなので、遅い接続やキューが満杯の接続があっても
//! ブロードキャスト全体が止まることはありません（満杯の場合は破棄）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{RwLock, mpsc::error::TrySendError};

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, ServerEvent},
    infrastructure::dto::conversion::encode_event,
};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: RwLock<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
        encode_event(event).map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.write().await;
        clients.insert(connection_id, sender);
        tracing::debug!(%connection_id, "Client registered to MessagePusher");
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.write().await;
        clients.remove(connection_id);
        tracing::debug!(%connection_id, "Client unregistered from MessagePusher");
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.read().await;

        let sender = clients
            .get(connection_id)
            .ok_or(MessagePushError::ClientNotFound(*connection_id))?;
        sender.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::QueueFull(*connection_id),
            TrySendError::Closed(_) => MessagePushError::QueueClosed(*connection_id),
        })?;
        tracing::debug!(%connection_id, "Pushed frame");
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &ServerEvent,
    ) -> Result<usize, MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.read().await;

        let mut delivered = 0;
        for connection_id in targets {
            let Some(sender) = clients.get(connection_id) else {
                // スナップショット取得後に切断された接続
                tracing::debug!(%connection_id, "Client not found during broadcast, skipping");
                continue;
            };
            // ブロードキャストでは一部の送信失敗を許容
            match sender.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(%connection_id, "Dropping frame for slow consumer");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(%connection_id, "Outbound queue closed, skipping");
                }
            }
        }

        Ok(delivered)
    }
}
