//! InMemory Connection Registry 実装
//!
//! 接続 → (ユーザー ID, 参加ルーム) の正引きと、ルーム → 接続の逆引きを
//! 1 つのロックの下で同時に更新し、両者が常に一致するようにします。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    ConnectionEntry, ConnectionId, ConnectionRegistry, RegistryError, RoomId, UserId,
};

#[derive(Default)]
struct RegistryTables {
    /// 接続ごとのエントリ
    connections: HashMap<ConnectionId, ConnectionEntry>,
    /// ルームごとの参加接続（空になったルームは削除する）
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl RegistryTables {
    fn detach(&mut self, connection_id: &ConnectionId, room_id: &RoomId) {
        if let Some(members) = self.rooms.get_mut(room_id) {
            members.remove(connection_id);
            if members.is_empty() {
                self.rooms.remove(room_id);
            }
        }
    }
}

/// インメモリ Connection Registry 実装
///
/// 全ての変更は単一の `RwLock` の書き込みロックで直列化されるため線形化可能。
/// `members_of` は読み取りロックの下でスナップショットを作る。
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    tables: RwLock<RegistryTables>,
    /// 1 接続あたりの参加ルーム数の上限（None は無制限）
    max_rooms_per_connection: Option<usize>,
}

impl InMemoryConnectionRegistry {
    /// 参加ルーム数無制限のレジストリを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 1 接続あたりの参加ルーム数に上限を設けたレジストリを作成
    pub fn with_room_limit(max_rooms_per_connection: Option<usize>) -> Self {
        Self {
            tables: RwLock::default(),
            max_rooms_per_connection,
        }
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> Result<(), RegistryError> {
        let mut tables = self.tables.write().await;
        if tables.connections.contains_key(&connection_id) {
            return Err(RegistryError::AlreadyRegistered(connection_id));
        }
        tables
            .connections
            .insert(connection_id, ConnectionEntry::new(user_id));
        Ok(())
    }

    async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<bool, RegistryError> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .connections
            .get_mut(connection_id)
            .ok_or(RegistryError::ConnectionNotFound(*connection_id))?;

        if entry.rooms.contains(&room_id) {
            return Ok(false);
        }
        if let Some(limit) = self.max_rooms_per_connection
            && entry.rooms.len() >= limit
        {
            return Err(RegistryError::RoomLimitExceeded { limit });
        }

        entry.rooms.insert(room_id.clone());
        tables.rooms.entry(room_id).or_default().insert(*connection_id);
        Ok(true)
    }

    async fn leave(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Result<bool, RegistryError> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .connections
            .get_mut(connection_id)
            .ok_or(RegistryError::ConnectionNotFound(*connection_id))?;

        if !entry.rooms.remove(room_id) {
            return Ok(false);
        }
        tables.detach(connection_id, room_id);
        Ok(true)
    }

    async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let tables = self.tables.read().await;
        tables
            .rooms
            .get(room_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    async fn user_of(&self, connection_id: &ConnectionId) -> Option<UserId> {
        let tables = self.tables.read().await;
        tables
            .connections
            .get(connection_id)
            .map(|entry| entry.user_id.clone())
    }

    async fn rooms_of(&self, connection_id: &ConnectionId) -> Option<Vec<RoomId>> {
        let tables = self.tables.read().await;
        tables.connections.get(connection_id).map(|entry| {
            let mut rooms: Vec<RoomId> = entry.rooms.iter().cloned().collect();
            rooms.sort();
            rooms
        })
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<ConnectionEntry> {
        let mut tables = self.tables.write().await;
        let entry = tables.connections.remove(connection_id)?;
        for room_id in &entry.rooms {
            tables.detach(connection_id, room_id);
        }
        Some(entry)
    }

    async fn count(&self) -> usize {
        self.tables.read().await.connections.len()
    }
}
