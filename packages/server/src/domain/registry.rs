//! Connection Registry trait 定義
//!
//! 「誰がどのルームにいるか」の唯一の情報源。トランスポートのライフサイクルからは切り離されており、
//! リレーはここから接続ハンドルを取得するだけでトランスポートに直接触れない。

use async_trait::async_trait;

use super::{
    entity::ConnectionEntry,
    error::RegistryError,
    value_object::{ConnectionId, RoomId, UserId},
};

/// 接続レジストリのインターフェース
///
/// 全ての操作は任意数の並行呼び出しに対して安全でなければならず、
/// 変更操作（register / join / leave / unregister）は線形化可能であること。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 参加ルームが空の状態で接続を登録
    ///
    /// 同じハンドルが既に登録済みの場合は `RegistryError::AlreadyRegistered`。
    async fn register(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> Result<(), RegistryError>;

    /// ルームに参加（冪等）。新たに参加した場合は `true`
    async fn join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
    ) -> Result<bool, RegistryError>;

    /// ルームから退出（冪等）。参加していた場合は `true`
    async fn leave(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Result<bool, RegistryError>;

    /// ルームに参加中の接続ハンドルのスナップショット
    ///
    /// 取得後に削除された接続は含まない。並行する join は観測されない場合がある。
    async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// 接続の認証済みユーザー ID
    async fn user_of(&self, connection_id: &ConnectionId) -> Option<UserId>;

    /// 接続の参加ルーム（ソート済み）
    async fn rooms_of(&self, connection_id: &ConnectionId) -> Option<Vec<RoomId>>;

    /// 参加ルームに関係なくエントリを削除し、削除したエントリを返す
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<ConnectionEntry>;

    /// 登録中の接続数
    async fn count(&self) -> usize;
}
