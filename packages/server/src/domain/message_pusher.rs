//! MessagePusher trait 定義
//!
//! 接続ごとの送信キューへイベントを積む。ソケットへの書き込みは各接続のハンドラが行う。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::ServerEvent, value_object::ConnectionId};

/// 接続ごとの有界送信キュー（シリアライズ済みフレーム）
pub type PusherChannel = mpsc::Sender<String>;

/// メッセージ通知のインターフェース
///
/// 遅いコンシューマがルーム全体へのファンアウトを止めないよう、
/// 実装はキューが満杯の場合にブロックせず破棄すること。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信キューを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信キューを削除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続へイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続へイベントを送信し、キューに積めた件数を返す
    ///
    /// 個々の接続への失敗は許容し、全体の失敗にはしない。
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &ServerEvent,
    ) -> Result<usize, MessagePushError>;
}
