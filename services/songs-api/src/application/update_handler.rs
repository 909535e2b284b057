/// 楽曲更新ハンドラー
///
/// PUT /songs で既存楽曲の属性を部分更新する。
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::application::ApiError;
use crate::application::payload::parse_json_object;
use crate::domain::{SongKey, SongUpdate};
use crate::infrastructure::SongRepository;

/// 更新リクエストのボディ
#[derive(Debug, Clone, Deserialize)]
struct UpdateSongRequest {
    #[serde(default)]
    album_name: Option<String>,
    #[serde(default)]
    song_title: Option<String>,
    #[serde(flatten)]
    changes: SongUpdate,
}

/// 更新結果のレスポンスボディ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    /// 更新された属性の新しい値
    pub updated_item: SongUpdate,
}

/// 楽曲更新ハンドラー
pub struct UpdateHandler<R>
where
    R: SongRepository,
{
    song_repo: R,
}

impl<R> UpdateHandler<R>
where
    R: SongRepository,
{
    pub fn new(song_repo: R) -> Self {
        Self { song_repo }
    }

    /// 楽曲を部分更新
    ///
    /// # 処理フロー
    /// 1. キー（album_name, song_title）を検証
    /// 2. 指定されたフィールドのみで部分更新を構築
    /// 3. 更新対象がなければ400
    /// 4. 対象レコードがなければ404
    pub async fn handle(&self, body: &[u8]) -> Result<UpdateResponse, ApiError> {
        let object = parse_json_object(body)?;

        let request: UpdateSongRequest = serde_json::from_value(Value::Object(object))
            .map_err(|err| ApiError::bad_request(format!("Invalid update payload: {err}")))?;

        let (Some(album_name), Some(song_title)) = (
            request.album_name.filter(|name| !name.is_empty()),
            request.song_title.filter(|title| !title.is_empty()),
        ) else {
            return Err(ApiError::bad_request("Album name and song title are required"));
        };

        if request.changes.is_empty() {
            return Err(ApiError::bad_request("No updates provided"));
        }

        let key = SongKey::new(album_name, song_title);

        let updated = self
            .song_repo
            .update(&key, &request.changes)
            .await
            .map_err(|err| {
                error!(
                    album_name = %key.album_name,
                    song_title = %key.song_title,
                    error = %err,
                    "楽曲の更新失敗"
                );
                ApiError::from(err)
            })?;

        let Some(updated_item) = updated else {
            return Err(ApiError::not_found("Song not found"));
        };

        info!(
            album_name = %key.album_name,
            song_title = %key.song_title,
            fields = request.changes.clauses().len(),
            "楽曲更新完了"
        );

        Ok(UpdateResponse { updated_item })
    }
}
