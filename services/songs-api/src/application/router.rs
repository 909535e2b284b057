// HTTPルーター
//
// ルーティング対応表に従ってリクエストを各ハンドラーへ振り分け、
// 結果をJSONレスポンスに変換する。

use std::sync::Arc;

use lambda_http::http::StatusCode;
use lambda_http::http::header::COOKIE;
use lambda_http::{Body, Error, Request, RequestExt, Response};
use tracing::{info, warn};

use crate::application::response::{json_response, preflight_response};
use crate::application::{
    ApiError, CreateHandler, FetchHandler, TranslateHandler, TranslateOutcome, UpdateHandler,
};
use crate::domain::{AuthorizationDecision, Route, RouteResolution, resolve, session_token_from_cookie};
use crate::infrastructure::{SessionVerifier, SongRepository, Translator};

/// Songs APIのルーター
///
/// リポジトリと翻訳クライアントを保持し、リクエストごとにハンドラーを生成する。
/// `session_verifier`が設定されている場合、変更系ルートでセッションを検証する。
pub struct ApiRouter<R, T>
where
    R: SongRepository + Clone,
    T: Translator + Clone,
{
    song_repo: R,
    translator: T,
    session_verifier: Option<Arc<dyn SessionVerifier>>,
}

impl<R, T> ApiRouter<R, T>
where
    R: SongRepository + Clone,
    T: Translator + Clone,
{
    pub fn new(song_repo: R, translator: T) -> Self {
        Self {
            song_repo,
            translator,
            session_verifier: None,
        }
    }

    /// 変更系ルートのセッション検証を有効にする
    pub fn with_session_verifier(mut self, verifier: Arc<dyn SessionVerifier>) -> Self {
        self.session_verifier = Some(verifier);
        self
    }

    /// リクエストを処理してレスポンスを返す
    pub async fn dispatch(&self, request: &Request) -> Result<Response<Body>, Error> {
        let method = request.method().as_str();
        let path = request.uri().path();

        let definition = match resolve(method, path) {
            RouteResolution::Matched(definition) => definition,
            RouteResolution::Preflight { allowed_methods } => {
                return preflight_response(&allowed_methods);
            }
            RouteResolution::MethodNotAllowed { allowed_methods } => {
                warn!(method, path, "許可されていないメソッド");
                return ApiError::method_not_allowed(format!(
                    "Method {method} not allowed (allowed: {})",
                    allowed_methods.join(", ")
                ))
                .into_response();
            }
            RouteResolution::NotFound => {
                warn!(method, path, "ルートが見つからない");
                return ApiError::not_found("Route not found").into_response();
            }
        };

        info!(method, path, route = ?definition.route, "リクエスト受信");

        if definition.gated
            && let Err(err) = self.authorize(request).await
        {
            return err.into_response();
        }

        match self.route(definition.route, request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                info!(
                    route = ?definition.route,
                    status = err.status().as_u16(),
                    message = err.message(),
                    "エラーレスポンス"
                );
                err.into_response()
            }
        }
    }

    /// セッションCookieを検証
    async fn authorize(&self, request: &Request) -> Result<(), ApiError> {
        let Some(verifier) = &self.session_verifier else {
            return Ok(());
        };

        let token = request
            .headers()
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(session_token_from_cookie);

        let Some(token) = token else {
            warn!(path = request.uri().path(), "セッションCookieがありません");
            return Err(ApiError::unauthorized("Session token is required"));
        };

        match verifier.verify(token).await? {
            AuthorizationDecision::Allow { principal_id } => {
                info!(principal_id = %principal_id, "セッション検証成功");
                Ok(())
            }
            AuthorizationDecision::Deny => {
                warn!(path = request.uri().path(), "無効なセッショントークン");
                Err(ApiError::forbidden("Invalid session token"))
            }
        }
    }

    /// ルートに対応するハンドラーを実行
    async fn route(&self, route: Route, request: &Request) -> Result<Response<Body>, ApiError> {
        let body: &[u8] = request.body().as_ref();

        let result = match route {
            Route::FetchSongs => {
                let params = request.query_string_parameters_ref();
                let album_name = params.and_then(|p| p.first("albumName"));
                let song_title = params.and_then(|p| p.first("songTitle"));

                let response = FetchHandler::new(self.song_repo.clone())
                    .handle(album_name, song_title)
                    .await?;
                json_response(StatusCode::OK, &response)
            }
            Route::CreateSong => {
                let song = CreateHandler::new(self.song_repo.clone()).handle(body).await?;
                json_response(StatusCode::CREATED, &song)
            }
            Route::UpdateSong => {
                let response = UpdateHandler::new(self.song_repo.clone()).handle(body).await?;
                json_response(StatusCode::OK, &response)
            }
            Route::TranslateQuery => {
                let params = request.query_string_parameters_ref();
                let album_name = params.and_then(|p| p.first("albumName"));
                let language = params.and_then(|p| p.first("language"));

                let response = self
                    .translate_handler()
                    .translate_album(album_name, language)
                    .await?;
                json_response(StatusCode::OK, &response)
            }
            Route::TranslateBody => {
                let params = request.query_string_parameters_ref();
                let album_name = params.and_then(|p| p.first("albumName"));

                // クエリにalbumNameがあればボディより優先する
                if album_name.is_some_and(|name| !name.is_empty()) {
                    let language = params.and_then(|p| p.first("language"));
                    let response = self
                        .translate_handler()
                        .translate_album(album_name, language)
                        .await?;
                    json_response(StatusCode::OK, &response)
                } else {
                    match self.translate_handler().handle_body(body).await? {
                        TranslateOutcome::Album(response) => json_response(StatusCode::OK, &response),
                        TranslateOutcome::Message(response) => {
                            json_response(StatusCode::OK, &response)
                        }
                    }
                }
            }
        };

        result.map_err(|err| ApiError::internal_error(err.to_string()))
    }

    fn translate_handler(&self) -> TranslateHandler<R, T> {
        TranslateHandler::new(self.song_repo.clone(), self.translator.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::response::tests::body_json;
    use crate::domain::song::tests::sample_song;
    use crate::infrastructure::StaticSessionVerifier;
    use crate::infrastructure::session_verifier::tests::MockSessionVerifier;
    use crate::infrastructure::song_repository::tests::MockSongRepository;
    use crate::infrastructure::translator::tests::MockTranslator;
    use lambda_http::http::Request as HttpRequest;
    use lambda_http::http::header::{ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE};
    use serde_json::json;
    use std::collections::HashMap;

    type TestRouter = ApiRouter<MockSongRepository, MockTranslator>;

    fn create_test_router() -> (TestRouter, MockSongRepository, MockTranslator) {
        let repo = MockSongRepository::with_songs(vec![
            sample_song("Let It Be", "Get Back"),
            sample_song("Let It Be", "Let It Be"),
            sample_song("Abbey Road", "Something"),
        ]);
        let translator = MockTranslator::new();
        (
            ApiRouter::new(repo.clone(), translator.clone()),
            repo,
            translator,
        )
    }

    fn request(method: &str, uri: &str, body: Body) -> Request {
        HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap()
    }

    fn with_query(request: Request, pairs: &[(&str, &str)]) -> Request {
        let params: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        request.with_query_string_parameters(params)
    }

    fn json_body(value: serde_json::Value) -> Body {
        Body::Text(value.to_string())
    }

    #[tokio::test]
    async fn test_get_songs_returns_album() {
        let (router, _, _) = create_test_router();
        let req = with_query(request("GET", "/songs", Body::Empty), &[("albumName", "Let It Be")]);

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        let body = body_json(&response);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_songs_with_song_title() {
        let (router, _, _) = create_test_router();
        let req = with_query(
            request("GET", "/dev/songs", Body::Empty),
            &[("albumName", "Let It Be"), ("songTitle", "Get Back")],
        );

        let response = router.dispatch(&req).await.unwrap();

        let body = body_json(&response);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["song_title"], "Get Back");
    }

    #[tokio::test]
    async fn test_get_songs_without_album_name_is_404() {
        let (router, _, _) = create_test_router();
        let req = with_query(request("GET", "/songs", Body::Empty), &[("songTitle", "Get Back")]);

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(&response)["message"], "Album not found");
    }

    #[tokio::test]
    async fn test_post_songs_creates_song() {
        let (router, repo, _) = create_test_router();
        let req = request(
            "POST",
            "/songs",
            json_body(json!({
                "album_name": "Revolver",
                "song_title": "Taxman",
                "artist": "Beatles",
                "genre": "Rock",
                "track_length": 159,
                "released": 1966
            })),
        );

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(&response)["song_title"], "Taxman");
        assert!(repo.get_song("Revolver", "Taxman").is_some());
    }

    #[tokio::test]
    async fn test_put_songs_updates_song() {
        let (router, repo, _) = create_test_router();
        let req = request(
            "PUT",
            "/songs",
            json_body(json!({
                "album_name": "Abbey Road",
                "song_title": "Something",
                "genre": "Ballad"
            })),
        );

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(&response),
            json!({"updatedItem": {"genre": "Ballad"}})
        );
        assert_eq!(repo.get_song("Abbey Road", "Something").unwrap().genre, "Ballad");
    }

    #[tokio::test]
    async fn test_put_songs_unknown_song_is_404() {
        let (router, _, _) = create_test_router();
        let req = request(
            "PUT",
            "/songs",
            json_body(json!({
                "album_name": "Abbey Road",
                "song_title": "Yesterday",
                "genre": "Ballad"
            })),
        );

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(&response),
            json!({"error": "not_found", "message": "Song not found"})
        );
    }

    #[tokio::test]
    async fn test_get_translate_with_query() {
        let (router, _, _) = create_test_router();
        let req = with_query(
            request("GET", "/translate", Body::Empty),
            &[("albumName", "Abbey Road"), ("language", "fr")],
        );

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let album = &body_json(&response)["translatedAlbum"];
        assert_eq!(album["song_title"], "[fr] Something");
        assert_eq!(album["released"], 1970);
    }

    #[tokio::test]
    async fn test_get_translate_missing_language_is_400() {
        let (router, _, translator) = create_test_router();
        let req = with_query(
            request("GET", "/translate", Body::Empty),
            &[("albumName", "Abbey Road")],
        );

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(translator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_post_translate_text() {
        let (router, _, _) = create_test_router();
        let req = request(
            "POST",
            "/translate",
            json_body(json!({"text": "Good morning", "language": "ja"})),
        );

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(&response)["translatedMessage"]["translatedText"],
            "[ja] Good morning"
        );
    }

    #[tokio::test]
    async fn test_post_translate_with_query() {
        let (router, _, translator) = create_test_router();
        let req = with_query(
            request("POST", "/translate", Body::Empty),
            &[("albumName", "Abbey Road"), ("language", "fr")],
        );

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let album = &body_json(&response)["translatedAlbum"];
        assert_eq!(album["song_title"], "[fr] Something");
        assert_eq!(translator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_post_translate_with_body() {
        let (router, _, _) = create_test_router();
        let req = request(
            "POST",
            "/translate",
            json_body(json!({"albumName": "Abbey Road", "language": "de"})),
        );

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(&response)["translatedAlbum"]["artist"],
            "[de] Beatles"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (router, _, _) = create_test_router();

        let response = router
            .dispatch(&request("GET", "/albums", Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(&response)["message"], "Route not found");
    }

    #[tokio::test]
    async fn test_nested_resource_path_is_404() {
        let (router, _, _) = create_test_router();

        for path in ["/translate/songs", "/anything/songs/extra", "/a/b/songs"] {
            let response = router
                .dispatch(&request("GET", path, Body::Empty))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405() {
        let (router, _, _) = create_test_router();

        let response = router
            .dispatch(&request("DELETE", "/songs", Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_options_is_preflight() {
        let (router, _, _) = create_test_router();

        let response = router
            .dispatch(&request("OPTIONS", "/songs", Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "GET, POST, PUT, OPTIONS"
        );
    }

    // ==================== セッション検証 ====================

    fn gated_router() -> (TestRouter, MockSongRepository) {
        let (router, repo, _) = create_test_router();
        let router = router.with_session_verifier(Arc::new(StaticSessionVerifier::new("secret")));
        (router, repo)
    }

    fn update_request(cookie: Option<&str>) -> Request {
        let mut builder = HttpRequest::builder().method("PUT").uri("/songs");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder
            .body(json_body(json!({
                "album_name": "Abbey Road",
                "song_title": "Something",
                "genre": "Ballad"
            })))
            .unwrap()
    }

    #[tokio::test]
    async fn test_gated_route_without_cookie_is_401() {
        let (router, repo) = gated_router();

        let response = router.dispatch(&update_request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(repo.get_song("Abbey Road", "Something").unwrap().genre, "Rock");
    }

    #[tokio::test]
    async fn test_gated_route_with_wrong_token_is_403() {
        let (router, repo) = gated_router();

        let response = router
            .dispatch(&update_request(Some("token=guess")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(repo.get_song("Abbey Road", "Something").unwrap().genre, "Rock");
    }

    #[tokio::test]
    async fn test_gated_route_with_valid_token() {
        let (router, repo) = gated_router();

        let response = router
            .dispatch(&update_request(Some("theme=dark; token=secret")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(repo.get_song("Abbey Road", "Something").unwrap().genre, "Ballad");
    }

    #[tokio::test]
    async fn test_ungated_route_ignores_missing_cookie() {
        let (router, _) = gated_router();
        let req = with_query(request("GET", "/songs", Body::Empty), &[("albumName", "Let It Be")]);

        let response = router.dispatch(&req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_verifier_failure_is_500() {
        let (router, repo, _) = create_test_router();
        let verifier = MockSessionVerifier::failing("backend unavailable");
        let router = router.with_session_verifier(Arc::new(verifier.clone()));

        let response = router
            .dispatch(&update_request(Some("token=secret")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(&response)["message"],
            "Session verification failed: backend unavailable"
        );
        assert_eq!(verifier.verified_tokens(), vec!["secret"]);
        assert_eq!(repo.get_song("Abbey Road", "Something").unwrap().genre, "Rock");
    }
}
