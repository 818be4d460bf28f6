//! UseCase: メッセージ送信（ルームリレー）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 永続化 → メンバー取得 → ファンアウトの順序
//!
//! ### なぜこのテストが必要か
//! - 永続化に失敗したメッセージは誰にも配信してはならない（persist-before-deliver）
//! - メッセージは対象ルームのメンバーにのみ届き、他のルームには漏れない
//! - 1 件の送信につき永続化はちょうど 1 回
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者を含むルームメンバー全員への配信
//! - 異常系：永続化の失敗、送信者が未登録
//! - エッジケース：メンバーのいないルーム、送信者がメンバーでないルーム

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, ConnectionRegistry, MessageContent, MessageId, MessageIdFactory,
    MessagePusher, MessageStore, RoomId, ServerEvent, Timestamp,
};

use super::{error::RelayError, room_lock::RoomLocks};

/// メッセージ送信のユースケース（ルームリレー）
pub struct SendMessageUseCase {
    /// MessageStore（永続化バックエンドの抽象化）
    store: Arc<dyn MessageStore>,
    /// ConnectionRegistry（接続とルーム参加状態の管理）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（メッセージ作成時刻）
    clock: Arc<dyn Clock>,
    /// ルームごとの直列化
    room_locks: RoomLocks,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        store: Arc<dyn MessageStore>,
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            registry,
            message_pusher,
            clock,
            room_locks: RoomLocks::new(),
        }
    }

    /// メッセージ送信を実行
    ///
    /// 送信者がルームのメンバーである必要はない。
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者の接続ハンドル
    /// * `room_id` - 送信先のルーム
    /// * `content` - メッセージ内容
    ///
    /// # Returns
    ///
    /// * `Ok(MessageId)` - 永続化されたメッセージの ID
    /// * `Err(RelayError)` - 送信失敗（この場合は誰にも配信されていない）
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        room_id: RoomId,
        content: MessageContent,
    ) -> Result<MessageId, RelayError> {
        let sender_user = self
            .registry
            .user_of(sender)
            .await
            .ok_or(RelayError::SenderNotRegistered)?;

        // 同じルームへの送信は永続化の順に配信する
        let _room_guard = self.room_locks.acquire(&room_id).await;

        // 1. メッセージを作成
        let message = ChatMessage::new(
            MessageIdFactory::generate(),
            room_id,
            sender_user,
            content,
            Timestamp::new(self.clock.now_millis()),
        );

        // 2. 永続化（失敗した場合は配信しない）
        let stored = self.store.create_message(&message).await.map_err(|e| {
            tracing::error!(
                message_id = %message.id,
                room_id = %message.room_id,
                "Failed to persist message: {}",
                e
            );
            RelayError::StorageFailure
        })?;

        // 3. その時点のルームメンバーへファンアウト
        let members = self.registry.members_of(&stored.room_id).await;
        let message_id = stored.id;
        let room_id = stored.room_id.clone();
        match self
            .message_pusher
            .broadcast(&members, &ServerEvent::MessageReceived(stored))
            .await
        {
            Ok(delivered) => tracing::debug!(
                %message_id,
                %room_id,
                members = members.len(),
                delivered,
                "Message relayed"
            ),
            Err(e) => tracing::warn!(%message_id, %room_id, "Fan-out failed: {}", e),
        }

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionIdFactory, MockMessageStore, StorageError, UserId},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
            store::InMemoryMessageStore,
        },
    };
    use hiroba_shared::time::FixedClock;
    use tokio::sync::mpsc;

    const NOW: i64 = 1672531200000;

    struct Fixture {
        registry: Arc<InMemoryConnectionRegistry>,
        pusher: Arc<WebSocketMessagePusher>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: Arc::new(InMemoryConnectionRegistry::new()),
                pusher: Arc::new(WebSocketMessagePusher::new()),
            }
        }

        fn usecase(&self, store: Arc<dyn MessageStore>) -> SendMessageUseCase {
            SendMessageUseCase::new(
                store,
                self.registry.clone(),
                self.pusher.clone(),
                Arc::new(FixedClock::new(NOW)),
            )
        }

        /// 接続を登録し、指定のルームに参加させる
        async fn connect(
            &self,
            user_id: &str,
            rooms: &[&str],
        ) -> (ConnectionId, mpsc::Receiver<String>) {
            let connection_id = ConnectionIdFactory::generate();
            let (tx, rx) = mpsc::channel(16);
            self.registry
                .register(connection_id, UserId::new(user_id.to_string()).unwrap())
                .await
                .unwrap();
            self.pusher.register_client(connection_id, tx).await;
            for room_id in rooms {
                self.registry
                    .join(&connection_id, room(room_id))
                    .await
                    .unwrap();
            }
            (connection_id, rx)
        }
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text.to_string()).unwrap()
    }

    fn parse(frame: Option<String>) -> serde_json::Value {
        serde_json::from_str(&frame.expect("frame expected")).unwrap()
    }

    #[tokio::test]
    async fn test_send_message_delivers_to_all_room_members() {
        // テスト項目: 送信者を含むルームの全メンバーにメッセージが届き、1 件だけ永続化される
        // given (前提条件):
        let fixture = Fixture::new();
        let store = Arc::new(InMemoryMessageStore::new());
        let usecase = fixture.usecase(store.clone());
        let (alice, mut alice_rx) = fixture.connect("alice", &["r1"]).await;
        let (_bob, mut bob_rx) = fixture.connect("bob", &["r1"]).await;

        // when (操作):
        let result = usecase.execute(&alice, room("r1"), content("hi")).await;

        // then (期待する結果):
        let message_id = result.unwrap();
        for rx in [&mut alice_rx, &mut bob_rx] {
            let frame = parse(rx.recv().await);
            assert_eq!(frame["type"], "receive-message");
            assert_eq!(frame["id"], message_id.to_string());
            assert_eq!(frame["message"], "hi");
            assert_eq!(frame["sender"], "alice");
            assert_eq!(frame["roomId"], "r1");
            assert_eq!(frame["timestamp"], "2023-01-01T00:00:00.000Z");
        }

        let stored = store.messages_in(&room("r1")).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, message_id);
        assert_eq!(stored[0].sender.as_str(), "alice");
        assert_eq!(stored[0].created_at, Timestamp::new(NOW));
    }

    #[tokio::test]
    async fn test_send_message_is_isolated_per_room() {
        // テスト項目: 別のルームにのみ参加している接続にはメッセージが届かない
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = fixture.usecase(Arc::new(InMemoryMessageStore::new()));
        let (alice, mut alice_rx) = fixture.connect("alice", &["r1"]).await;
        let (_carol, mut carol_rx) = fixture.connect("carol", &["r2"]).await;

        // when (操作):
        usecase
            .execute(&alice, room("r1"), content("hi"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(alice_rx.recv().await.is_some());
        assert!(carol_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_message_storage_failure_delivers_nothing() {
        // テスト項目: 永続化に失敗した場合は StorageFailure を返し、誰にも配信しない
        // given (前提条件):
        let fixture = Fixture::new();
        let mut store = MockMessageStore::new();
        store
            .expect_create_message()
            .times(1)
            .returning(|_| Err(StorageError::Unavailable("connection refused".to_string())));
        let usecase = fixture.usecase(Arc::new(store));
        let (alice, mut alice_rx) = fixture.connect("alice", &["r1"]).await;
        let (bob, mut bob_rx) = fixture.connect("bob", &["r1"]).await;

        // when (操作):
        let result = usecase.execute(&alice, room("r1"), content("hi")).await;

        // then (期待する結果): メンバーシップは変わらない
        assert_eq!(result, Err(RelayError::StorageFailure));
        assert!(alice_rx.try_recv().is_err());
        assert!(bob_rx.try_recv().is_err());
        assert_eq!(
            fixture.registry.rooms_of(&bob).await,
            Some(vec![room("r1")])
        );
    }

    #[tokio::test]
    async fn test_send_message_persists_before_delivery() {
        // テスト項目: 永続化が呼ばれた時点では、まだ誰のキューにも積まれていない
        // given (前提条件):
        let fixture = Fixture::new();
        let alice = ConnectionIdFactory::generate();
        let (alice_tx, mut alice_rx) = mpsc::channel(16);
        let probe = alice_tx.clone();
        fixture
            .registry
            .register(alice, UserId::new("alice".to_string()).unwrap())
            .await
            .unwrap();
        fixture.registry.join(&alice, room("r1")).await.unwrap();
        fixture.pusher.register_client(alice, alice_tx).await;

        let (observed_tx, mut observed_rx) = mpsc::unbounded_channel();
        let mut store = MockMessageStore::new();
        store.expect_create_message().times(1).returning(move |message| {
            // 永続化時点でのキューの空き容量を記録
            observed_tx.send(probe.capacity()).unwrap();
            Ok(message.clone())
        });
        let usecase = fixture.usecase(Arc::new(store));

        // when (操作):
        usecase
            .execute(&alice, room("r1"), content("hi"))
            .await
            .unwrap();

        // then (期待する結果): 永続化時点ではキューは空、その後に配信される
        assert_eq!(observed_rx.recv().await, Some(16));
        assert!(alice_rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_send_message_to_empty_room() {
        // テスト項目: メンバーのいないルームへの送信も成功し、永続化される
        // given (前提条件):
        let fixture = Fixture::new();
        let store = Arc::new(InMemoryMessageStore::new());
        let usecase = fixture.usecase(store.clone());
        let (alice, mut alice_rx) = fixture.connect("alice", &[]).await;

        // when (操作): alice 自身もメンバーではない
        let result = usecase.execute(&alice, room("empty"), content("hello?")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(store.messages_in(&room("empty")).await.len(), 1);
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_message_unregistered_sender() {
        // テスト項目: 未登録の接続からの送信はエラーになり、永続化されない
        // given (前提条件):
        let fixture = Fixture::new();
        let mut store = MockMessageStore::new();
        store.expect_create_message().never();
        let usecase = fixture.usecase(Arc::new(store));
        let unknown = ConnectionIdFactory::generate();

        // when (操作):
        let result = usecase.execute(&unknown, room("r1"), content("hi")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RelayError::SenderNotRegistered));
    }

    #[tokio::test]
    async fn test_concurrent_sends_are_delivered_in_persistence_order() {
        // テスト項目: 同じルームへの並行送信は、永続化された順に全メンバーへ届く
        // given (前提条件):
        let fixture = Fixture::new();
        let store = Arc::new(InMemoryMessageStore::new());
        let usecase = Arc::new(fixture.usecase(store.clone()));
        let (alice, _alice_rx) = fixture.connect("alice", &[]).await;
        let (_bob, mut bob_rx) = fixture.connect("bob", &["r1"]).await;
        let (_carol, mut carol_rx) = fixture.connect("carol", &["r1"]).await;

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..10 {
            let usecase = usecase.clone();
            handles.push(tokio::spawn(async move {
                usecase
                    .execute(&alice, room("r1"), content(&format!("msg-{i}")))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let persisted: Vec<String> = store
            .messages_in(&room("r1"))
            .await
            .into_iter()
            .map(|m| m.id.to_string())
            .collect();
        for rx in [&mut bob_rx, &mut carol_rx] {
            let mut received = Vec::new();
            while let Ok(frame) = rx.try_recv() {
                received.push(parse(Some(frame))["id"].as_str().unwrap().to_string());
            }
            assert_eq!(received, persisted);
        }
    }
}
