/// Songs API HTTP Lambdaエントリポイント
///
/// API Gateway経由のHTTPリクエストを受け取り、ルーターで各ハンドラーに振り分ける。
///
/// # 環境変数
/// - TABLE_NAME: Songsテーブル名（必須）
/// - REGION: AWSリージョン（任意）
/// - SESSION_TOKEN: 設定時は変更系ルートでセッションCookieを検証
/// - RUST_LOG: ログレベル
use std::sync::Arc;

use lambda_http::{Body, Error, Request, Response, run, service_fn};
use songs_api::application::{ApiError, ApiRouter};
use songs_api::infrastructure::{
    AwsTranslator, ConfigError, DynamoSongRepository, SongsConfig, StaticSessionVerifier,
    init_logging,
};
use tokio::sync::OnceCell;
use tracing::{error, info};

type SongsRouter = ApiRouter<DynamoSongRepository, AwsTranslator>;

/// ルーターの静的インスタンス
///
/// Lambda warm start時にAWSクライアントを再利用するため、
/// 一度初期化したルーターを静的に保持する。
static ROUTER: OnceCell<SongsRouter> = OnceCell::const_new();

/// ルーターを取得（初期化されていなければ初期化）
async fn get_router() -> Result<&'static SongsRouter, ConfigError> {
    ROUTER
        .get_or_try_init(|| async {
            let config = SongsConfig::from_env().await?;
            info!(
                table_name = config.table_name(),
                region = config.region(),
                "AWSクライアントを初期化"
            );

            let song_repo = DynamoSongRepository::new(config.dynamodb_client(), config.table_name());
            let translator = AwsTranslator::new(config.translate_client());
            let router = ApiRouter::new(song_repo, translator);

            let router = match StaticSessionVerifier::from_env_optional() {
                Some(verifier) => {
                    info!("セッション検証を有効化");
                    router.with_session_verifier(Arc::new(verifier))
                }
                None => router,
            };
            Ok(router)
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    run(service_fn(handler)).await
}

/// HTTPリクエストハンドラー
///
/// 設定の読み込みに失敗した場合はリクエストを処理せず500を返す。
async fn handler(request: Request) -> Result<Response<Body>, Error> {
    let router = match get_router().await {
        Ok(router) => router,
        Err(e) => {
            error!(error = %e, "設定の読み込み失敗");
            return ApiError::internal_error(e.to_string()).into_response();
        }
    };

    router.dispatch(&request).await
}
