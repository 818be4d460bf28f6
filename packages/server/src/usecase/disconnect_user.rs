//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUserUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断後の接続がどのルームのメンバーにも残っていないことを保証する
//! - 二度呼ばれても安全であること

use std::sync::Arc;

use crate::domain::{ConnectionEntry, ConnectionId, ConnectionRegistry, MessagePusher};

/// 切断処理のユースケース
pub struct DisconnectUserUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUserUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 接続をレジストリと MessagePusher から削除する
    ///
    /// # Returns
    ///
    /// 削除されたエントリ。既に削除済みの場合は `None`
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<ConnectionEntry> {
        // 先にレジストリから外し、以降のファンアウト対象にならないようにする
        let entry = self.registry.unregister(connection_id).await;
        self.message_pusher.unregister_client(connection_id).await;
        entry
    }
}
