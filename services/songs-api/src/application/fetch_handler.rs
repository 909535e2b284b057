/// 楽曲取得ハンドラー
///
/// GET /songs でアルバム名（と任意の曲名）に一致する楽曲一覧を返す。
use serde::Serialize;
use tracing::{error, info};

use crate::application::ApiError;
use crate::domain::Song;
use crate::infrastructure::SongRepository;

/// 取得結果のレスポンスボディ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResponse {
    pub data: Vec<Song>,
}

/// 楽曲取得ハンドラー
pub struct FetchHandler<R>
where
    R: SongRepository,
{
    song_repo: R,
}

impl<R> FetchHandler<R>
where
    R: SongRepository,
{
    pub fn new(song_repo: R) -> Self {
        Self { song_repo }
    }

    /// 楽曲一覧を取得
    ///
    /// # 処理フロー
    /// 1. albumNameがなければ404
    /// 2. アルバム名でクエリ
    /// 3. songTitleがあれば完全一致でフィルタ
    /// 4. 結果コンテナ自体がなければ404
    pub async fn handle(
        &self,
        album_name: Option<&str>,
        song_title: Option<&str>,
    ) -> Result<FetchResponse, ApiError> {
        let Some(album_name) = album_name.filter(|name| !name.is_empty()) else {
            return Err(ApiError::not_found("Album not found"));
        };
        let song_title = song_title.filter(|title| !title.is_empty());

        let songs = self.song_repo.find_by_album(album_name).await.map_err(|err| {
            error!(album_name, error = %err, "アルバムのクエリ失敗");
            ApiError::from(err)
        })?;

        let Some(songs) = songs else {
            return Err(ApiError::not_found("Invalid Album Name or Song Title"));
        };

        let data: Vec<Song> = match song_title {
            Some(title) => songs.into_iter().filter(|song| song.song_title == title).collect(),
            None => songs,
        };

        info!(album_name, song_title = ?song_title, count = data.len(), "楽曲取得完了");

        Ok(FetchResponse { data })
    }
}
