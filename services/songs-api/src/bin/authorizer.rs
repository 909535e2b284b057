/// API Gateway Lambda Authorizerエントリポイント
///
/// セッションCookieを検証し、API Gatewayに許可/拒否のIAMポリシーを返す。
/// 結果はキャッシュしない（TTL 0秒）設定で使う。
///
/// # 環境変数
/// - SESSION_TOKEN: 有効なセッショントークン（必須）
use aws_lambda_events::apigw::{
    ApiGatewayCustomAuthorizerRequestTypeRequest, ApiGatewayCustomAuthorizerResponse,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use songs_api::application::AuthorizerHandler;
use songs_api::domain::AUTHORIZER_RESULT_TTL_SECONDS;
use songs_api::infrastructure::{StaticSessionVerifier, init_logging};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let verifier = StaticSessionVerifier::from_env().map_err(|e| {
        error!(error = %e, "Authorizerの初期化失敗");
        e
    })?;
    let handler = AuthorizerHandler::new(verifier);
    let handler = &handler;

    info!(
        result_ttl_seconds = AUTHORIZER_RESULT_TTL_SECONDS,
        "Authorizer Lambda関数を初期化"
    );

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<ApiGatewayCustomAuthorizerRequestTypeRequest>| async move {
            let response: ApiGatewayCustomAuthorizerResponse =
                handler.handle(&event.payload).await?;
            Ok::<ApiGatewayCustomAuthorizerResponse, Error>(response)
        },
    ))
    .await
}
