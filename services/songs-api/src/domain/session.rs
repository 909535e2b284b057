/// セッションCookieの解析
///
/// `Cookie`ヘッダーからセッショントークンを取り出す。

/// セッショントークンを保持するCookie名
pub const SESSION_COOKIE_NAME: &str = "token";

/// `Cookie`ヘッダーの値からセッショントークンを取り出す
///
/// `name=value; name2=value2` 形式を想定し、空の値は無視する。
pub fn session_token_from_cookie(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE_NAME)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Authorizerの判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// 許可（プリンシパルIDを伴う）
    Allow { principal_id: String },
    /// 拒否
    Deny,
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow { .. })
    }
}
