/// Authorizerハンドラー
///
/// API Gateway Lambda Authorizer（REQUESTタイプ）のイベントから
/// セッションCookieを取り出して検証し、IAMポリシーを返す。
use aws_lambda_events::apigw::{
    ApiGatewayCustomAuthorizerPolicy, ApiGatewayCustomAuthorizerRequestTypeRequest,
    ApiGatewayCustomAuthorizerResponse,
};
use aws_lambda_events::http::header::COOKIE;
use aws_lambda_events::iam::{IamPolicyEffect, IamPolicyStatement};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{AuthorizationDecision, session_token_from_cookie};
use crate::infrastructure::{SessionVerifier, SessionVerifierError};

/// IAMポリシーのバージョン
const POLICY_VERSION: &str = "2012-10-17";

/// 許可・拒否の対象アクション
const INVOKE_ACTION: &str = "execute-api:Invoke";

/// 拒否時のプリンシパルID
const ANONYMOUS_PRINCIPAL: &str = "anonymous";

/// Authorizerハンドラーのエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthorizerError {
    /// methodArnが欠落
    #[error("Missing methodArn in authorizer event")]
    MissingMethodArn,
    /// 検証処理の失敗
    #[error("Verification failed: {0}")]
    VerificationFailed(String),
}

impl From<SessionVerifierError> for AuthorizerError {
    fn from(err: SessionVerifierError) -> Self {
        AuthorizerError::VerificationFailed(err.to_string())
    }
}

/// methodArnに対する1ステートメントのポリシーを持つレスポンスを構築
pub fn policy_response(
    principal_id: impl Into<String>,
    effect: IamPolicyEffect,
    method_arn: &str,
) -> ApiGatewayCustomAuthorizerResponse {
    let mut statement = IamPolicyStatement::default();
    statement.action = vec![INVOKE_ACTION.to_string()];
    statement.effect = effect;
    statement.resource = vec![method_arn.to_string()];

    let mut policy = ApiGatewayCustomAuthorizerPolicy::default();
    policy.version = Some(POLICY_VERSION.to_string());
    policy.statement = vec![statement];

    let mut response = ApiGatewayCustomAuthorizerResponse::default();
    response.principal_id = Some(principal_id.into());
    response.policy_document = policy;
    response
}

/// すべてのステートメントが許可かどうか
pub fn is_allowed(response: &ApiGatewayCustomAuthorizerResponse) -> bool {
    let statements = &response.policy_document.statement;
    !statements.is_empty()
        && statements
            .iter()
            .all(|statement| statement.effect == IamPolicyEffect::Allow)
}

/// Authorizerイベントを処理するハンドラー
pub struct AuthorizerHandler<V>
where
    V: SessionVerifier,
{
    verifier: V,
}

impl<V> AuthorizerHandler<V>
where
    V: SessionVerifier,
{
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    /// Authorizerイベントを処理
    ///
    /// # 処理フロー
    /// 1. methodArnを取得
    /// 2. Cookieヘッダーからセッショントークンを取得
    /// 3. トークンを検証して許可/拒否ポリシーを返す
    pub async fn handle(
        &self,
        event: &ApiGatewayCustomAuthorizerRequestTypeRequest,
    ) -> Result<ApiGatewayCustomAuthorizerResponse, AuthorizerError> {
        let method_arn = event
            .method_arn
            .as_deref()
            .filter(|arn| !arn.is_empty())
            .ok_or(AuthorizerError::MissingMethodArn)?;

        // 複数のCookieヘッダーがあれば順に探す
        let token = event
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(session_token_from_cookie);

        let Some(token) = token else {
            warn!(method_arn, "セッショントークンがありません");
            return Ok(policy_response(ANONYMOUS_PRINCIPAL, IamPolicyEffect::Deny, method_arn));
        };

        match self.verifier.verify(token).await? {
            AuthorizationDecision::Allow { principal_id } => {
                info!(method_arn, principal_id = %principal_id, "アクセス許可");
                Ok(policy_response(principal_id, IamPolicyEffect::Allow, method_arn))
            }
            AuthorizationDecision::Deny => {
                warn!(method_arn, "アクセス拒否");
                Ok(policy_response(ANONYMOUS_PRINCIPAL, IamPolicyEffect::Deny, method_arn))
            }
        }
    }
}
