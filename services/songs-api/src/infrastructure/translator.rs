//! 翻訳モジュール
//!
//! Amazon Translateによるテキスト翻訳を提供する。
//! 1回の呼び出しで1テキストを翻訳し、再試行は行わない。

use async_trait::async_trait;
use aws_sdk_translate::Client as TranslateClient;
use thiserror::Error;
use tracing::debug;

/// 翻訳のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TranslateError {
    /// AWS SDK エラー
    #[error("AWS Translate APIエラー: {0}")]
    AwsSdkError(String),
}

/// 翻訳トレイト（テスト用の抽象化）
#[async_trait]
pub trait Translator: Send + Sync {
    /// テキストを翻訳する
    ///
    /// # 引数
    /// * `text` - 翻訳するテキスト
    /// * `source_language` - 翻訳元の言語コード
    /// * `target_language` - 翻訳先の言語コード
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslateError>;
}

/// 実際のAWS Translate SDKを使用した翻訳実装
#[derive(Debug, Clone)]
pub struct AwsTranslator {
    client: TranslateClient,
}

impl AwsTranslator {
    /// 新しいAwsTranslatorを作成
    pub fn new(client: TranslateClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Translator for AwsTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslateError> {
        let output = self
            .client
            .translate_text()
            .text(text)
            .source_language_code(source_language)
            .target_language_code(target_language)
            .send()
            .await
            .map_err(|e| TranslateError::AwsSdkError(e.into_service_error().to_string()))?;

        debug!(source_language, target_language, "翻訳完了");

        Ok(output.translated_text().to_string())
    }
}
