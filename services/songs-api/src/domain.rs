// Domain layer modules
pub mod route;
pub mod session;
pub mod song;
pub mod translation;

// Re-exports
pub use route::{
    AUTHORIZER_RESULT_TTL_SECONDS, ROUTES, Route, RouteDefinition, RouteResolution, resolve,
};
pub use session::{AuthorizationDecision, SESSION_COOKIE_NAME, session_token_from_cookie};
pub use song::{PARTITION_KEY, SORT_KEY, Song, SongKey, SongUpdate, UpdateExpression, UpdateValue};
pub use translation::{SOURCE_LANGUAGE, TranslatableField, TranslatedMessage, TranslationResult};
