//! Message Store trait 定義
//!
//! 外部の永続化バックエンドへの狭い契約。このコアはメッセージの作成のみを行う。

use async_trait::async_trait;

use super::{entity::ChatMessage, error::StorageError};

/// メッセージ永続化のインターフェース
///
/// 書き込みは at-least-once で十分とし、冪等キーは扱わない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを 1 件永続化し、保存されたレコードを返す
    async fn create_message(&self, message: &ChatMessage) -> Result<ChatMessage, StorageError>;
}
