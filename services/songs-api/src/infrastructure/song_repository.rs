/// DynamoDBで楽曲レコードを管理するリポジトリ
///
/// パーティションキー`album_name`、ソートキー`song_title`のテーブルに対して
/// クエリ・書き込み・部分更新を行う。
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, ReturnValue, WriteRequest};
use thiserror::Error;
use tracing::debug;

use crate::domain::{PARTITION_KEY, SORT_KEY, Song, SongKey, SongUpdate, UpdateValue};

/// BatchWriteItemの1リクエストあたりの最大件数
pub const BATCH_WRITE_LIMIT: usize = 25;

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// DynamoDBからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),

    /// データのシリアライズ/デシリアライズに失敗
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_dynamo::Error> for RepositoryError {
    fn from(err: serde_dynamo::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

/// 楽曲レコード操作用トレイト
///
/// 実際のDynamoDBとテスト用モックを差し替えられるように抽象化する。
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// アルバム名に一致する楽曲をすべて取得
    ///
    /// # 戻り値
    /// * `Ok(Some(songs))` - クエリ結果（空の場合もある）
    /// * `Ok(None)` - ストアが結果コンテナ自体を返さなかった
    /// * `Err(RepositoryError)` - 読み取り失敗
    async fn find_by_album(&self, album_name: &str) -> Result<Option<Vec<Song>>, RepositoryError>;

    /// アルバム名に一致する最初の楽曲を1件だけ取得
    async fn find_first_by_album(&self, album_name: &str) -> Result<Option<Song>, RepositoryError>;

    /// 楽曲を書き込む（同じキーのレコードがあれば上書き）
    async fn put(&self, song: &Song) -> Result<(), RepositoryError>;

    /// 複数の楽曲をまとめて書き込み、書き込んだ件数を返す
    async fn put_batch(&self, songs: &[Song]) -> Result<usize, RepositoryError>;

    /// 既存の楽曲を部分更新し、更新後の属性を返す
    ///
    /// # 戻り値
    /// * `Ok(Some(attributes))` - 更新された属性の新しい値
    /// * `Ok(None)` - 対象のレコードが存在しない
    /// * `Err(RepositoryError)` - 書き込み失敗
    async fn update(
        &self,
        key: &SongKey,
        changes: &SongUpdate,
    ) -> Result<Option<SongUpdate>, RepositoryError>;
}

/// SongRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoSongRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// Songsテーブル名
    table_name: String,
}

impl DynamoSongRepository {
    /// 新しいDynamoSongRepositoryを作成
    pub fn new(client: DynamoDbClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// テーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// 更新値をAttributeValueに変換
    fn to_attribute_value(value: &UpdateValue) -> AttributeValue {
        match value {
            UpdateValue::Text(text) => AttributeValue::S(text.clone()),
            UpdateValue::Number(number) => AttributeValue::N(number.clone()),
        }
    }

    /// 楽曲をDynamoDBアイテムに変換
    fn to_item(song: &Song) -> Result<HashMap<String, AttributeValue>, RepositoryError> {
        Ok(serde_dynamo::to_item(song)?)
    }

    /// キー属性を構築
    fn key_attributes(key: &SongKey) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                PARTITION_KEY.to_string(),
                AttributeValue::S(key.album_name.clone()),
            ),
            (SORT_KEY.to_string(), AttributeValue::S(key.song_title.clone())),
        ])
    }
}

#[async_trait]
impl SongRepository for DynamoSongRepository {
    async fn find_by_album(&self, album_name: &str) -> Result<Option<Vec<Song>>, RepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("album_name = :album_name")
            .expression_attribute_values(":album_name", AttributeValue::S(album_name.to_string()))
            .send()
            .await
            .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

        match output.items {
            Some(items) => {
                debug!(album_name, count = items.len(), "アルバムのクエリ完了");
                let songs: Vec<Song> = serde_dynamo::from_items(items)?;
                Ok(Some(songs))
            }
            None => Ok(None),
        }
    }

    async fn find_first_by_album(&self, album_name: &str) -> Result<Option<Song>, RepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("album_name = :album_name")
            .expression_attribute_values(":album_name", AttributeValue::S(album_name.to_string()))
            .limit(1)
            .send()
            .await
            .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

        if let Some(items) = output.items
            && let Some(item) = items.into_iter().next()
        {
            return Ok(Some(serde_dynamo::from_item(item)?));
        }

        Ok(None)
    }

    async fn put(&self, song: &Song) -> Result<(), RepositoryError> {
        let item = Self::to_item(song)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }

    async fn put_batch(&self, songs: &[Song]) -> Result<usize, RepositoryError> {
        let mut written = 0;

        for chunk in songs.chunks(BATCH_WRITE_LIMIT) {
            let mut requests = Vec::with_capacity(chunk.len());
            for song in chunk {
                let put_request = PutRequest::builder()
                    .set_item(Some(Self::to_item(song)?))
                    .build()
                    .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
                requests.push(WriteRequest::builder().put_request(put_request).build());
            }

            let output = self
                .client
                .batch_write_item()
                .request_items(&self.table_name, requests)
                .send()
                .await
                .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

            // 未処理アイテムは再送せずエラーとして返す
            let unprocessed = output
                .unprocessed_items
                .as_ref()
                .and_then(|items| items.get(&self.table_name))
                .map(|requests| requests.len())
                .unwrap_or(0);
            if unprocessed > 0 {
                return Err(RepositoryError::WriteError(format!(
                    "{unprocessed} items were not processed (written so far: {written})"
                )));
            }

            written += chunk.len();
        }

        Ok(written)
    }

    async fn update(
        &self,
        key: &SongKey,
        changes: &SongUpdate,
    ) -> Result<Option<SongUpdate>, RepositoryError> {
        let Some(expression) = changes.update_expression() else {
            return Err(RepositoryError::WriteError("No attributes to update".to_string()));
        };

        let values: HashMap<String, AttributeValue> = expression
            .values()
            .iter()
            .map(|(placeholder, value)| (placeholder.clone(), Self::to_attribute_value(value)))
            .collect();

        // 存在しないキーへの更新で新規レコードが作られないよう条件を付ける
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key_attributes(key)))
            .update_expression(expression.expression())
            .condition_expression("attribute_exists(album_name)")
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await;

        match result {
            Ok(output) => match output.attributes {
                Some(attributes) => Ok(Some(serde_dynamo::from_item(attributes)?)),
                None => Ok(None),
            },
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    return Ok(None);
                }
                Err(RepositoryError::WriteError(service_error.to_string()))
            }
        }
    }
}
