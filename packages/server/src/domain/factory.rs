//! ID の生成

use uuid::Uuid;

use super::value_object::{ConnectionId, MessageId};

/// 接続ハンドルのファクトリ
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// ランダムな接続ハンドルを生成（UUID v4）
    pub fn generate() -> ConnectionId {
        ConnectionId::new(Uuid::new_v4())
    }
}

/// メッセージ ID のファクトリ
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// 時刻順にソート可能なメッセージ ID を生成（UUID v7）
    pub fn generate() -> MessageId {
        MessageId::new(Uuid::now_v7())
    }
}
