//! Token Verifier trait 定義

use super::{error::AuthError, value_object::UserId};

/// 接続時に提示されたベアラートークンを検証し、ユーザー ID を取り出す
///
/// 状態を持たない純粋な検証であり、任意の数のハンドラから並行に呼ばれる。
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}
