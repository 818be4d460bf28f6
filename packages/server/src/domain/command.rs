//! 受信コマンド
//!
//! プロトコル境界で一度だけデコードされ、以降は型付きで扱われる。

use super::value_object::{MessageContent, RoomId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    JoinRoom {
        room_id: RoomId,
    },
    LeaveRoom {
        room_id: RoomId,
    },
    SendMessage {
        room_id: RoomId,
        content: MessageContent,
    },
    /// 未知の `type`。ログに出力して無視する
    Unrecognized,
}
