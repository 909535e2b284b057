/// 楽曲登録ハンドラー
///
/// POST /songs でリクエストボディの楽曲をそのまま書き込む。
/// 既存チェックは行わず、同じキーのレコードは上書きされる。
use serde_json::Value;
use tracing::{error, info};

use crate::application::ApiError;
use crate::application::payload::{non_empty_str, parse_json_object};
use crate::domain::{PARTITION_KEY, SORT_KEY, Song};
use crate::infrastructure::SongRepository;

/// 楽曲登録ハンドラー
pub struct CreateHandler<R>
where
    R: SongRepository,
{
    song_repo: R,
}

impl<R> CreateHandler<R>
where
    R: SongRepository,
{
    pub fn new(song_repo: R) -> Self {
        Self { song_repo }
    }

    /// 楽曲を登録し、書き込んだレコードを返す
    ///
    /// # 処理フロー
    /// 1. ボディをJSONとして解析
    /// 2. album_name / song_title の存在を検証
    /// 3. 残りの属性を含めてSongに変換
    /// 4. ストアに書き込み
    pub async fn handle(&self, body: &[u8]) -> Result<Song, ApiError> {
        let object = parse_json_object(body)?;

        if non_empty_str(&object, &[PARTITION_KEY]).is_none()
            || non_empty_str(&object, &[SORT_KEY]).is_none()
        {
            return Err(ApiError::bad_request("Album name and song title are required"));
        }

        let song: Song = serde_json::from_value(Value::Object(object))
            .map_err(|err| ApiError::bad_request(format!("Invalid song payload: {err}")))?;

        self.song_repo.put(&song).await.map_err(|err| {
            error!(
                album_name = %song.album_name,
                song_title = %song.song_title,
                error = %err,
                "楽曲の書き込み失敗"
            );
            ApiError::from(err)
        })?;

        info!(
            album_name = %song.album_name,
            song_title = %song.song_title,
            "楽曲登録完了"
        );

        Ok(song)
    }
}
