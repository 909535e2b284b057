/// AWS接続設定
///
/// 環境変数からテーブル名とリージョンを読み込み、
/// DynamoDB/Translateクライアントを生成する。
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_translate::Client as TranslateClient;
use thiserror::Error;

/// テーブル名の環境変数
pub const TABLE_NAME_VAR: &str = "TABLE_NAME";

/// リージョンの環境変数
pub const REGION_VAR: &str = "REGION";

/// 設定読み込みのエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// 環境変数から読み込んだ値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSettings {
    /// Songsテーブル名
    pub table_name: String,
    /// リージョン（未設定時はデフォルトのプロバイダーチェーンに任せる）
    pub region: Option<String>,
}

impl EnvSettings {
    /// 環境変数から読み込み
    ///
    /// 環境変数:
    /// - TABLE_NAME: Songsテーブル名（必須）
    /// - REGION: AWSリージョン（任意）
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から読み込み（空文字は未設定扱い）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let table_name =
            get(TABLE_NAME_VAR).ok_or_else(|| ConfigError::MissingEnvVar(TABLE_NAME_VAR.to_string()))?;
        let region = get(REGION_VAR);

        Ok(Self { table_name, region })
    }
}

/// テーブル名とAWS設定を持つSongs API設定
#[derive(Debug, Clone)]
pub struct SongsConfig {
    sdk_config: SdkConfig,
    table_name: String,
}

impl SongsConfig {
    /// 環境からAWS設定とテーブル名を読み込んで作成
    pub async fn from_env() -> Result<Self, ConfigError> {
        let settings = EnvSettings::from_env()?;
        Ok(Self::load(settings).await)
    }

    /// 読み込み済みの値からAWS設定を構築
    pub async fn load(settings: EnvSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = settings.region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;

        Self {
            sdk_config,
            table_name: settings.table_name,
        }
    }

    /// 明示的な値で作成（テスト用）
    pub fn new(sdk_config: SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            sdk_config,
            table_name: table_name.into(),
        }
    }

    /// テーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// リージョンを取得
    pub fn region(&self) -> Option<&str> {
        self.sdk_config.region().map(|region| region.as_ref())
    }

    /// DynamoDBクライアントを生成
    pub fn dynamodb_client(&self) -> DynamoDbClient {
        DynamoDbClient::new(&self.sdk_config)
    }

    /// Translateクライアントを生成
    pub fn translate_client(&self) -> TranslateClient {
        TranslateClient::new(&self.sdk_config)
    }
}
