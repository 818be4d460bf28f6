//! ルーム単位の直列化
//!
//! 同じルームへのブロードキャストは「永続化 → ファンアウト」の区間を排他的に実行し、
//! 永続化の順序と配信の順序を一致させます。異なるルームは並行に処理されます。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::RoomId;

/// ルームごとの非同期ロック表
///
/// 誰も保持・待機していないロックは解放時に表から取り除く。
#[derive(Default)]
pub struct RoomLocks {
    locks: Mutex<HashMap<RoomId, Arc<AsyncMutex<()>>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// ルームのロックを取得
    pub async fn acquire(&self, room_id: &RoomId) -> RoomGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(room_id.clone()).or_default().clone()
        };
        let guard = lock.lock_owned().await;

        RoomGuard {
            locks: self,
            room_id: room_id.clone(),
            guard: Some(guard),
        }
    }

    /// 表に残っているロックの数
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// ルームロックのガード。drop で解放される
pub struct RoomGuard<'a> {
    locks: &'a RoomLocks,
    room_id: RoomId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for RoomGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        // 表だけが参照している場合、保持者も待機者もいない
        let mut locks = self.locks.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks
            .get(&self.room_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.room_id);
        }
    }
}
