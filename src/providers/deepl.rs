/*!
 * DeepL REST translation client.
 *
 * Each subtitle entry becomes one `text` item of a `/v2/translate` request;
 * DeepL answers with translations in request order.
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{BatchTranslation, TranslationProvider, require_target_language};
use crate::subtitle_processor::SubtitleEntry;

const DEFAULT_ENDPOINT: &str = "https://api-free.deepl.com";

/// DeepL client
#[derive(Debug)]
pub struct DeepL {
    client: Client,
    api_key: String,
    translate_url: Url,
}

/// DeepL translate request
#[derive(Debug, Serialize)]
pub struct DeepLRequest<'a> {
    /// Texts to translate, one per subtitle entry
    text: Vec<String>,
    /// Upper-case target language code
    target_lang: &'a str,
    /// Keep line breaks inside each text
    preserve_formatting: bool,
}

/// DeepL translate response
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    pub translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    pub text: String,
}

impl DeepL {
    /// Create a new DeepL client; the endpoint must be an absolute http(s) URL
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let endpoint = endpoint.into();
        let base = if endpoint.trim().is_empty() { DEFAULT_ENDPOINT.to_string() } else { endpoint };
        let translate_url = Url::parse(&base)
            .and_then(|url| url.join("/v2/translate"))
            .with_context(|| format!("Invalid DeepL endpoint: {}", base))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            translate_url,
        })
    }

    pub fn translate_url(&self) -> &Url {
        &self.translate_url
    }

    /// Translate texts, answering in request order
    pub async fn translate_texts(&self, texts: Vec<String>, target_lang: &str) -> Result<Vec<String>, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationError("DeepL API key is required".to_string()));
        }

        let request = DeepLRequest {
            text: texts,
            target_lang,
            preserve_formatting: true,
        };

        let response = self
            .client
            .post(self.translate_url.clone())
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to send request to DeepL API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("DeepL API error ({}): {}", status, error_text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(error_text),
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(error_text),
                // Quota exceeded
                status if status.as_u16() == 456 => ProviderError::RateLimitExceeded(error_text),
                _ => ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let body = response
            .json::<DeepLResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse DeepL response: {}", e)))?;

        Ok(body.translations.into_iter().map(|t| t.text).collect())
    }
}

/// Pair translated texts with the batch entries they belong to
fn zip_translations(batch: &[SubtitleEntry], texts: Vec<String>) -> Result<BatchTranslation, ProviderError> {
    if texts.len() != batch.len() {
        return Err(ProviderError::ParseError(format!(
            "DeepL returned {} translations for {} entries",
            texts.len(),
            batch.len()
        )));
    }

    Ok(batch
        .iter()
        .zip(texts)
        .map(|(entry, text)| (entry.index, text.lines().map(str::to_string).collect()))
        .collect())
}

#[async_trait]
impl TranslationProvider for DeepL {
    fn name(&self) -> &str {
        "deepl"
    }

    async fn translate_batch(
        &self,
        batch: &[SubtitleEntry],
        target_language: &str,
    ) -> Result<BatchTranslation, ProviderError> {
        let target_language = require_target_language(target_language)?;
        if batch.is_empty() {
            return Ok(BatchTranslation::new());
        }

        let target_lang = language_utils::to_part1_upper(target_language);
        let texts = batch.iter().map(SubtitleEntry::original_text).collect();
        debug!("Sending {} texts to DeepL ({})", batch.len(), target_lang);

        let translated = self.translate_texts(texts, &target_lang).await?;
        zip_translations(batch, translated)
    }
}
