//! JWT を使った TokenVerifier 実装
//!
//! トークンは外部の認証サービスが発行する。ここでは署名と有効期限の検証、
//! および `userId` クレームの取り出しのみを行う。

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthError, TokenVerifier, UserId};

/// トークンに含まれるクレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    /// 有効期限（Unix 秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// 共有シークレットで HS256 署名を検証する TokenVerifier
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// 新しい JwtTokenVerifier を作成
    ///
    /// `exp` クレームは存在する場合のみ、猶予なしで検証する。必須にするには
    /// [`JwtTokenVerifier::require_expiry`] を使う。`aud` などの追加クレームは検証しない。
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// `exp` クレームのないトークンを拒否するかどうか
    pub fn require_expiry(mut self, required: bool) -> Self {
        if required {
            self.validation.set_required_spec_claims(&["exp"]);
        } else {
            self.validation.required_spec_claims.clear();
        }
        self
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("Token expired"),
                    kind => tracing::debug!("Token rejected: {:?}", kind),
                }
                AuthError::Invalid
            })?;

        UserId::new(token_data.claims.user_id).map_err(|_| AuthError::Invalid)
    }
}
