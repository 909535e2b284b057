//! APIレスポンスとエラーハンドリング
//!
//! 統一されたJSONレスポンス形式を提供する。
//! すべてのエラーは`error`と`message`フィールドを含むJSONで返却される。

use lambda_http::http::StatusCode;
use lambda_http::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use lambda_http::{Body, Error, Response};
use serde::{Deserialize, Serialize};

use crate::infrastructure::{RepositoryError, SessionVerifierError, TranslateError};

/// APIエラーレスポンスのボディ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// エラー種別（例: "bad_request", "not_found", "internal_error"）
    pub error: String,
    /// 詳細なエラーメッセージ
    pub message: String,
}

/// APIエラー
///
/// ステータスコードとJSON形式のエラーボディを持つ。
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                error: error.into(),
                message: message.into(),
            },
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    /// 403 Forbidden
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// 405 Method Not Allowed
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", message)
    }

    /// 500 Internal Server Error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    pub fn error(&self) -> &str {
        &self.body.error
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// HTTPレスポンスに変換
    pub fn into_response(self) -> Result<Response<Body>, Error> {
        json_response(self.status, &self.body)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.status.as_u16(), self.body.error, self.body.message)
    }
}

impl std::error::Error for ApiError {}

// アダプターの失敗はすべて500として生のエラーを返す
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::internal_error(err.to_string())
    }
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        ApiError::internal_error(err.to_string())
    }
}

impl From<SessionVerifierError> for ApiError {
    fn from(err: SessionVerifierError) -> Self {
        ApiError::internal_error(err.to_string())
    }
}

/// JSONボディのHTTPレスポンスを構築
///
/// Content-Type: application/json と Access-Control-Allow-Origin: * を付与する。
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, Error> {
    let json = serde_json::to_string(body)?;

    let response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::Text(json))?;

    Ok(response)
}

/// CORSプリフライトへの204レスポンスを構築
pub fn preflight_response(allowed_methods: &[&str]) -> Result<Response<Body>, Error> {
    let mut methods = allowed_methods.to_vec();
    methods.push("OPTIONS");

    let response = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, X-Amz-Date")
        .header(ACCESS_CONTROL_ALLOW_METHODS, methods.join(", "))
        .body(Body::Empty)?;

    Ok(response)
}
