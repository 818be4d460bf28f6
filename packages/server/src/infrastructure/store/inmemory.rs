//! InMemory Message Store 実装
//!
//! ルームごとにメッセージを作成順で保持します。プロセス終了で失われるため、
//! 本番では同じ `MessageStore` trait を実装した永続化バックエンドに差し替えます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageStore, RoomId, StorageError};

/// インメモリ Message Store 実装
#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: Mutex<HashMap<RoomId, Vec<ChatMessage>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// ルームのメッセージを作成順で取得
    pub async fn messages_in(&self, room_id: &RoomId) -> Vec<ChatMessage> {
        let messages = self.messages.lock().await;
        messages.get(room_id).cloned().unwrap_or_default()
    }

    /// 保存済みメッセージの総数
    pub async fn count(&self) -> usize {
        let messages = self.messages.lock().await;
        messages.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create_message(&self, message: &ChatMessage) -> Result<ChatMessage, StorageError> {
        let mut messages = self.messages.lock().await;
        messages
            .entry(message.room_id.clone())
            .or_default()
            .push(message.clone());
        tracing::debug!(
            message_id = %message.id,
            room_id = %message.room_id,
            "Message stored"
        );
        Ok(message.clone())
    }
}
