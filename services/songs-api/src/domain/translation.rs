// 翻訳ドメインモデル
//
// 翻訳対象フィールドの固定集合と、フィールドごとの翻訳結果を扱う。
// 翻訳結果は1レスポンス限りで永続化しない。

use std::collections::BTreeMap;

use serde::Serialize;

use super::Song;

/// 翻訳元言語（固定）
pub const SOURCE_LANGUAGE: &str = "en";

/// 翻訳対象のフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TranslatableField {
    Artist,
    Genre,
    SongTitle,
}

impl TranslatableField {
    /// 翻訳対象フィールドの全集合
    pub const ALL: [TranslatableField; 3] = [
        TranslatableField::Artist,
        TranslatableField::Genre,
        TranslatableField::SongTitle,
    ];

    /// 属性名を取得
    pub fn name(&self) -> &'static str {
        match self {
            TranslatableField::Artist => "artist",
            TranslatableField::Genre => "genre",
            TranslatableField::SongTitle => "song_title",
        }
    }

    /// 楽曲から対応するフィールドの値を取得
    pub fn value_of<'a>(&self, song: &'a Song) -> &'a str {
        match self {
            TranslatableField::Artist => &song.artist,
            TranslatableField::Genre => &song.genre,
            TranslatableField::SongTitle => &song.song_title,
        }
    }
}

/// フィールドごとの翻訳結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationResult {
    fields: BTreeMap<TranslatableField, String>,
}

impl TranslationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 翻訳済みの値を登録
    pub fn insert(&mut self, field: TranslatableField, translated: impl Into<String>) {
        self.fields.insert(field, translated.into());
    }

    /// 翻訳済みの値を取得
    pub fn get(&self, field: TranslatableField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// 翻訳済みフィールド数
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 翻訳結果を楽曲に上書きした新しい楽曲を返す
    ///
    /// 翻訳されていないフィールドは元の値のまま残る。
    pub fn merge_into(&self, mut song: Song) -> Song {
        for (field, translated) in &self.fields {
            let target = match field {
                TranslatableField::Artist => &mut song.artist,
                TranslatableField::Genre => &mut song.genre,
                TranslatableField::SongTitle => &mut song.song_title,
            };
            *target = translated.clone();
        }
        song
    }
}

/// 自由テキスト翻訳の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedMessage {
    pub translated_text: String,
    pub source_language_code: String,
    pub target_language_code: String,
}
