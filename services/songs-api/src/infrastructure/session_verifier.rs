//! セッショントークン検証
//!
//! Authorizerとルーターの変更系ゲートで共有する検証ロジック。
//! - 環境変数に設定されたセッショントークンと照合
//! - 判定結果はキャッシュしない

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::AuthorizationDecision;
use crate::infrastructure::config::ConfigError;

/// セッショントークンの環境変数
pub const SESSION_TOKEN_VAR: &str = "SESSION_TOKEN";

/// 検証処理のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionVerifierError {
    /// 検証基盤の呼び出しに失敗
    #[error("Session verification failed: {0}")]
    VerificationFailed(String),
}

/// セッショントークン検証トレイト
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// トークンを検証して許可/拒否を返す
    async fn verify(&self, token: &str) -> Result<AuthorizationDecision, SessionVerifierError>;
}

/// 共有シークレットと照合する検証実装
#[derive(Clone)]
pub struct StaticSessionVerifier {
    /// 有効なセッショントークン
    session_token: String,
    /// 許可時に返すプリンシパルID
    principal_id: String,
}

impl std::fmt::Debug for StaticSessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // トークンはログに出さない
        f.debug_struct("StaticSessionVerifier")
            .field("principal_id", &self.principal_id)
            .finish_non_exhaustive()
    }
}

impl StaticSessionVerifier {
    /// 既定のプリンシパルID
    pub const DEFAULT_PRINCIPAL_ID: &'static str = "songs-api-user";

    pub fn new(session_token: impl Into<String>) -> Self {
        Self {
            session_token: session_token.into(),
            principal_id: Self::DEFAULT_PRINCIPAL_ID.to_string(),
        }
    }

    /// プリンシパルIDを設定
    pub fn with_principal_id(mut self, principal_id: impl Into<String>) -> Self {
        self.principal_id = principal_id.into();
        self
    }

    /// 環境変数SESSION_TOKENから作成
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_optional()
            .ok_or_else(|| ConfigError::MissingEnvVar(SESSION_TOKEN_VAR.to_string()))
    }

    /// 環境変数SESSION_TOKENが設定されている場合のみ作成
    pub fn from_env_optional() -> Option<Self> {
        std::env::var(SESSION_TOKEN_VAR)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .map(Self::new)
    }
}

#[async_trait]
impl SessionVerifier for StaticSessionVerifier {
    async fn verify(&self, token: &str) -> Result<AuthorizationDecision, SessionVerifierError> {
        if token == self.session_token {
            Ok(AuthorizationDecision::Allow {
                principal_id: self.principal_id.clone(),
            })
        } else {
            Ok(AuthorizationDecision::Deny)
        }
    }
}
