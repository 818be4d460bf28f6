//! UseCase: 接続の認証と登録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectUserUseCase::authenticate() / execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 認証に失敗した接続はレジストリに一切触れてはならない
//! - 認証に成功した接続は参加ルームが空の状態で登録され、connected 通知を受け取る
//!
//! ### どのような状況を想定しているか
//! - 正常系：有効なトークンでの接続
//! - 異常系：トークンなし・不正なトークン

use std::sync::Arc;

use crate::domain::{
    AuthError, ConnectionId, ConnectionIdFactory, ConnectionRegistry, MessagePusher,
    PusherChannel, ServerEvent, TokenVerifier, UserId,
};

use super::error::ConnectError;

/// 接続の認証と登録のユースケース
pub struct ConnectUserUseCase {
    /// TokenVerifier（トークン検証の抽象化）
    verifier: Arc<dyn TokenVerifier>,
    /// ConnectionRegistry（接続とルーム参加状態の管理）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectUserUseCase {
    /// 新しい ConnectUserUseCase を作成
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            verifier,
            registry,
            message_pusher,
        }
    }

    /// ハンドシェイクで提示されたトークンを検証する
    ///
    /// 副作用はなく、失敗した場合はレジストリに触れずに接続を拒否する。
    pub fn authenticate(&self, token: Option<&str>) -> Result<UserId, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::Missing)?;
        self.verifier.verify(token)
    }

    /// 認証済みの接続を登録し、connected 通知をキューに積む
    ///
    /// # Arguments
    ///
    /// * `user_id` - 認証済みのユーザー ID
    /// * `sender` - この接続の送信キュー
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 登録された接続ハンドル
    /// * `Err(ConnectError)` - 登録失敗
    pub async fn execute(
        &self,
        user_id: UserId,
        sender: PusherChannel,
    ) -> Result<ConnectionId, ConnectError> {
        let connection_id = ConnectionIdFactory::generate();

        // 1. レジストリに登録（参加ルームは空）
        self.registry
            .register(connection_id, user_id.clone())
            .await?;

        // 2. 送信キューを登録
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        // 3. 接続確認を通知
        if let Err(e) = self
            .message_pusher
            .push_to(&connection_id, &ServerEvent::Connected { user_id })
            .await
        {
            tracing::warn!(%connection_id, "Failed to push connected notification: {}", e);
        }

        Ok(connection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::MockTokenVerifier,
        infrastructure::{
            message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
        },
    };
    use tokio::sync::mpsc;

    fn create_usecase(
        verifier: MockTokenVerifier,
    ) -> (ConnectUserUseCase, Arc<InMemoryConnectionRegistry>) {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ConnectUserUseCase::new(
            Arc::new(verifier),
            registry.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        );
        (usecase, registry)
    }

    #[test]
    fn test_authenticate_success() {
        // テスト項目: 有効なトークンからユーザー ID が取り出される
        // given (前提条件):
        let mut verifier = MockTokenVerifier::new();
        verifier
            .expect_verify()
            .withf(|token| token == "valid-token")
            .returning(|_| Ok(UserId::new("alice".to_string()).unwrap()));
        let (usecase, _registry) = create_usecase(verifier);

        // when (操作):
        let result = usecase.authenticate(Some("valid-token"));

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_authenticate_missing_token() {
        // テスト項目: トークンがない・空の場合は検証せずに Missing を返す
        // given (前提条件):
        let mut verifier = MockTokenVerifier::new();
        verifier.expect_verify().never();
        let (usecase, _registry) = create_usecase(verifier);

        // when (操作):
        let none = usecase.authenticate(None);
        let blank = usecase.authenticate(Some("  "));

        // then (期待する結果):
        assert_eq!(none, Err(AuthError::Missing));
        assert_eq!(blank, Err(AuthError::Missing));
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token_leaves_registry_untouched() {
        // テスト項目: 不正なトークンは拒否され、レジストリにエントリは作られない
        // given (前提条件):
        let mut verifier = MockTokenVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(AuthError::Invalid));
        let (usecase, registry) = create_usecase(verifier);

        // when (操作):
        let result = usecase.authenticate(Some("expired-token"));

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::Invalid));
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_execute_registers_and_notifies() {
        // テスト項目: 登録後、参加ルームは空で、connected 通知がキューに積まれる
        // given (前提条件):
        let (usecase, registry) = create_usecase(MockTokenVerifier::new());
        let (tx, mut rx) = mpsc::channel(8);
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作):
        let connection_id = usecase.execute(alice.clone(), tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(registry.user_of(&connection_id).await, Some(alice));
        assert_eq!(registry.rooms_of(&connection_id).await, Some(vec![]));
        assert_eq!(
            rx.recv().await,
            Some(r#"{"type":"connected","userId":"alice"}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_execute_issues_distinct_handles_for_same_user() {
        // テスト項目: 同じユーザーの複数接続はそれぞれ別のハンドルで登録される
        // given (前提条件):
        let (usecase, registry) = create_usecase(MockTokenVerifier::new());
        let alice = UserId::new("alice".to_string()).unwrap();
        let (tx1, _rx1) = mpsc::channel(8);
        let (tx2, _rx2) = mpsc::channel(8);

        // when (操作):
        let first = usecase.execute(alice.clone(), tx1).await.unwrap();
        let second = usecase.execute(alice, tx2).await.unwrap();

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(registry.count().await, 2);
    }
}
