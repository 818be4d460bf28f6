//! エンティティ定義

use std::collections::HashSet;

use super::value_object::{MessageContent, MessageId, RoomId, Timestamp, UserId};

/// ルームにブロードキャストされる 1 件のメッセージ
///
/// リレーが生成し、永続化後はイミュータブル。このコアが更新・削除することはない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender: UserId,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(
        id: MessageId,
        room_id: RoomId,
        sender: UserId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            sender,
            content,
            created_at,
        }
    }
}

/// レジストリに登録された 1 接続の状態
///
/// `rooms` は join 済みかつ未 leave のルームを正確に反映する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEntry {
    pub user_id: UserId,
    pub rooms: HashSet<RoomId>,
}

impl ConnectionEntry {
    /// 参加ルームが空の状態で作成
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            rooms: HashSet::new(),
        }
    }
}
