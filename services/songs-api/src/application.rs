// アプリケーション層モジュール
pub mod authorizer_handler;
pub mod create_handler;
pub mod fetch_handler;
pub mod payload;
pub mod response;
pub mod router;
pub mod translate_handler;
pub mod update_handler;

// 再エクスポート
pub use authorizer_handler::{AuthorizerError, AuthorizerHandler};
pub use create_handler::CreateHandler;
pub use fetch_handler::{FetchHandler, FetchResponse};
pub use response::{ApiError, ApiErrorBody};
pub use router::ApiRouter;
pub use translate_handler::{
    TranslateHandler, TranslateOutcome, TranslatedAlbumResponse, TranslatedMessageResponse,
};
pub use update_handler::{UpdateHandler, UpdateResponse};
