/// ルーティング宣言
///
/// HTTPメソッドとリソースパスからハンドラーへの静的な対応表。
/// 変更系ルートはAuthorizerによるセッション検証を必要とする。

/// Authorizerの判定結果のキャッシュ秒数（キャッシュしない）
pub const AUTHORIZER_RESULT_TTL_SECONDS: u32 = 0;

/// ハンドラーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// アルバム（と任意の曲名）で楽曲を取得
    FetchSongs,
    /// 楽曲を登録
    CreateSong,
    /// 楽曲を部分更新
    UpdateSong,
    /// クエリパラメータでアルバム情報を翻訳
    TranslateQuery,
    /// リクエストボディでアルバム情報またはテキストを翻訳
    TranslateBody,
}

/// 対応表の1行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDefinition {
    pub method: &'static str,
    pub resource: &'static str,
    pub route: Route,
    /// Authorizerを通す必要があるか
    pub gated: bool,
}

/// ルーティング対応表
pub const ROUTES: &[RouteDefinition] = &[
    RouteDefinition {
        method: "GET",
        resource: "songs",
        route: Route::FetchSongs,
        gated: false,
    },
    RouteDefinition {
        method: "POST",
        resource: "songs",
        route: Route::CreateSong,
        gated: true,
    },
    RouteDefinition {
        method: "PUT",
        resource: "songs",
        route: Route::UpdateSong,
        gated: true,
    },
    RouteDefinition {
        method: "GET",
        resource: "translate",
        route: Route::TranslateQuery,
        gated: false,
    },
    RouteDefinition {
        method: "POST",
        resource: "translate",
        route: Route::TranslateBody,
        gated: false,
    },
];

/// ルーティング解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResolution {
    /// 対応するルートが見つかった
    Matched(RouteDefinition),
    /// CORSプリフライト（OPTIONS）
    Preflight { allowed_methods: Vec<&'static str> },
    /// リソースはあるがメソッドが許可されていない
    MethodNotAllowed { allowed_methods: Vec<&'static str> },
    /// リソースが存在しない
    NotFound,
}

/// 対応表に載っているリソース名か
fn is_known_resource(segment: &str) -> bool {
    ROUTES.iter().any(|definition| definition.resource == segment)
}

/// パスからリソース名を取り出す
///
/// 先頭に置けるのはステージ名（`/dev/songs`）の1セグメントまで。
/// ステージ名がリソース名と同じパス（`/translate/songs`）は受け付けない。
pub fn resource_of(path: &str) -> Option<&str> {
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    match segments.as_slice() {
        [resource] => Some(*resource),
        [stage, resource] if !is_known_resource(stage) => Some(*resource),
        _ => None,
    }
}

/// メソッドとパスからルートを解決
pub fn resolve(method: &str, path: &str) -> RouteResolution {
    let Some(resource) = resource_of(path) else {
        return RouteResolution::NotFound;
    };

    let allowed_methods: Vec<&'static str> = ROUTES
        .iter()
        .filter(|definition| definition.resource == resource)
        .map(|definition| definition.method)
        .collect();

    if allowed_methods.is_empty() {
        return RouteResolution::NotFound;
    }

    if method.eq_ignore_ascii_case("OPTIONS") {
        return RouteResolution::Preflight { allowed_methods };
    }

    ROUTES
        .iter()
        .find(|definition| {
            definition.resource == resource && definition.method.eq_ignore_ascii_case(method)
        })
        .map(|definition| RouteResolution::Matched(*definition))
        .unwrap_or(RouteResolution::MethodNotAllowed { allowed_methods })
}
