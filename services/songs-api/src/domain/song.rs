/// 楽曲ドメインモデル
///
/// Songsテーブルの1レコードを表す`Song`と、
/// 部分更新を表す`SongUpdate`を提供する。
use serde::{Deserialize, Serialize};

/// パーティションキー属性名
pub const PARTITION_KEY: &str = "album_name";

/// ソートキー属性名
pub const SORT_KEY: &str = "song_title";

/// 楽曲レコード
///
/// (album_name, song_title) の組で一意に識別される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// アルバム名（パーティションキー）
    pub album_name: String,
    /// 曲名（ソートキー）
    pub song_title: String,
    /// アーティスト名
    pub artist: String,
    /// ジャンル
    pub genre: String,
    /// 曲の長さ
    pub track_length: f64,
    /// リリース年
    pub released: i32,
}

impl Song {
    /// このレコードのキーを取得
    pub fn key(&self) -> SongKey {
        SongKey::new(self.album_name.clone(), self.song_title.clone())
    }
}

/// 楽曲の複合キー
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongKey {
    pub album_name: String,
    pub song_title: String,
}

impl SongKey {
    pub fn new(album_name: impl Into<String>, song_title: impl Into<String>) -> Self {
        Self {
            album_name: album_name.into(),
            song_title: song_title.into(),
        }
    }
}

/// 楽曲の部分更新
///
/// `Some`のフィールドのみがSET句になり、`None`のフィールドは
/// ストア上の値をそのまま残す。DynamoDBの`UPDATED_NEW`で返される
/// 更新後の属性もこの型で表現する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<i32>,
}

/// SET句に渡す値
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateValue {
    /// 文字列属性（DynamoDBの`S`）
    Text(String),
    /// 数値属性（DynamoDBの`N`、10進表記）
    Number(String),
}

/// `SET a = :a, b = :b` 形式の更新式とプレースホルダー値
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    expression: String,
    values: Vec<(String, UpdateValue)>,
}

impl UpdateExpression {
    /// 更新式文字列を取得
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// プレースホルダー名と値の組を取得
    pub fn values(&self) -> &[(String, UpdateValue)] {
        &self.values
    }
}

impl SongUpdate {
    /// 更新対象のフィールドが1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.artist.is_none()
            && self.genre.is_none()
            && self.track_length.is_none()
            && self.released.is_none()
    }

    /// 更新対象の属性名と値を列挙する
    ///
    /// 並び順はgenre, artist, track_length, releasedで固定。
    pub fn clauses(&self) -> Vec<(&'static str, UpdateValue)> {
        let mut clauses = Vec::new();

        if let Some(genre) = &self.genre {
            clauses.push(("genre", UpdateValue::Text(genre.clone())));
        }
        if let Some(artist) = &self.artist {
            clauses.push(("artist", UpdateValue::Text(artist.clone())));
        }
        if let Some(track_length) = self.track_length {
            clauses.push(("track_length", UpdateValue::Number(track_length.to_string())));
        }
        if let Some(released) = self.released {
            clauses.push(("released", UpdateValue::Number(released.to_string())));
        }

        clauses
    }

    /// DynamoDB向けの更新式を構築
    ///
    /// 更新対象がない場合は`None`を返す。
    pub fn update_expression(&self) -> Option<UpdateExpression> {
        let clauses = self.clauses();
        if clauses.is_empty() {
            return None;
        }

        let assignments: Vec<String> = clauses
            .iter()
            .map(|(name, _)| format!("{name} = :{name}"))
            .collect();

        let values = clauses
            .into_iter()
            .map(|(name, value)| (format!(":{name}"), value))
            .collect();

        Some(UpdateExpression {
            expression: format!("SET {}", assignments.join(", ")),
            values,
        })
    }

    /// 楽曲に部分更新を適用する
    pub fn apply_to(&self, song: &mut Song) {
        if let Some(artist) = &self.artist {
            song.artist = artist.clone();
        }
        if let Some(genre) = &self.genre {
            song.genre = genre.clone();
        }
        if let Some(track_length) = self.track_length {
            song.track_length = track_length;
        }
        if let Some(released) = self.released {
            song.released = released;
        }
    }
}
