/// 翻訳ハンドラー
///
/// GET|POST /translate でアルバム情報（artist, genre, song_title）を翻訳する。
/// POSTボディに`text`がある場合は自由テキストの翻訳として扱う。
use serde::Serialize;
use tracing::{error, info};

use crate::application::ApiError;
use crate::application::payload::{non_empty_str, parse_json_object};
use crate::domain::{SOURCE_LANGUAGE, Song, TranslatableField, TranslatedMessage, TranslationResult};
use crate::infrastructure::{SongRepository, Translator};

/// アルバム翻訳のレスポンスボディ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedAlbumResponse {
    pub translated_album: Song,
}

/// テキスト翻訳のレスポンスボディ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedMessageResponse {
    pub translated_message: TranslatedMessage,
}

/// POST /translate の結果
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateOutcome {
    Album(TranslatedAlbumResponse),
    Message(TranslatedMessageResponse),
}

/// 翻訳ハンドラー
pub struct TranslateHandler<R, T>
where
    R: SongRepository,
    T: Translator,
{
    song_repo: R,
    translator: T,
}

impl<R, T> TranslateHandler<R, T>
where
    R: SongRepository,
    T: Translator,
{
    pub fn new(song_repo: R, translator: T) -> Self {
        Self {
            song_repo,
            translator,
        }
    }

    /// アルバム情報を翻訳
    ///
    /// # 処理フロー
    /// 1. albumName / language を検証（翻訳APIは呼ばない）
    /// 2. アルバム名で最初の1曲を取得
    /// 3. 翻訳対象フィールドのうち空でないものを順に翻訳
    /// 4. 翻訳結果を上書きした楽曲を返す
    ///
    /// 途中で翻訳に失敗した場合は部分的な結果を返さずにエラーとする。
    pub async fn translate_album(
        &self,
        album_name: Option<&str>,
        language: Option<&str>,
    ) -> Result<TranslatedAlbumResponse, ApiError> {
        let album_name = album_name.filter(|name| !name.is_empty());
        let language = language.filter(|lang| !lang.is_empty());

        let (Some(album_name), Some(language)) = (album_name, language) else {
            return Err(ApiError::bad_request("Album name and language are required"));
        };

        let song = self
            .song_repo
            .find_first_by_album(album_name)
            .await
            .map_err(|err| {
                error!(album_name, error = %err, "アルバムの取得失敗");
                ApiError::from(err)
            })?;

        let Some(song) = song else {
            return Err(ApiError::bad_request("Album not found"));
        };

        let mut translations = TranslationResult::new();
        for field in TranslatableField::ALL {
            let value = field.value_of(&song);
            if value.is_empty() {
                continue;
            }

            let translated = self
                .translator
                .translate(value, SOURCE_LANGUAGE, language)
                .await
                .map_err(|err| {
                    error!(
                        album_name,
                        field = field.name(),
                        language,
                        error = %err,
                        "翻訳失敗"
                    );
                    ApiError::from(err)
                })?;
            translations.insert(field, translated);
        }

        info!(
            album_name,
            language,
            translated_fields = translations.len(),
            "アルバム翻訳完了"
        );

        Ok(TranslatedAlbumResponse {
            translated_album: translations.merge_into(song),
        })
    }

    /// 自由テキストを翻訳
    pub async fn translate_text(
        &self,
        text: Option<&str>,
        language: Option<&str>,
    ) -> Result<TranslatedMessageResponse, ApiError> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Err(ApiError::bad_request("missing text from the body"));
        };
        let Some(language) = language.filter(|lang| !lang.is_empty()) else {
            return Err(ApiError::bad_request("missing language from the body"));
        };

        let translated_text = self
            .translator
            .translate(text, SOURCE_LANGUAGE, language)
            .await
            .map_err(|err| {
                error!(language, error = %err, "テキスト翻訳失敗");
                ApiError::from(err)
            })?;

        info!(language, "テキスト翻訳完了");

        Ok(TranslatedMessageResponse {
            translated_message: TranslatedMessage {
                translated_text,
                source_language_code: SOURCE_LANGUAGE.to_string(),
                target_language_code: language.to_string(),
            },
        })
    }

    /// POSTボディから翻訳種別を判定して処理
    ///
    /// `albumName`（または`album_name`）があればアルバム翻訳、
    /// なければ`text`の翻訳として扱う。
    pub async fn handle_body(&self, body: &[u8]) -> Result<TranslateOutcome, ApiError> {
        let object = parse_json_object(body)?;
        let language = non_empty_str(&object, &["language"]);

        if let Some(album_name) = non_empty_str(&object, &["albumName", "album_name"]) {
            let response = self.translate_album(Some(album_name), language).await?;
            return Ok(TranslateOutcome::Album(response));
        }

        let text = non_empty_str(&object, &["text"]);
        let response = self.translate_text(text, language).await?;
        Ok(TranslateOutcome::Message(response))
    }
}
