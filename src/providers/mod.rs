/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for translation backends:
 * - Anthropic: LLM chat API fed with a marker-delimited payload
 * - DeepL: DeepL REST translation API
 * - Mock: deterministic in-process provider for tests and dry runs
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::app_config::{ProviderKind, TranslationConfig};
use crate::errors::ProviderError;
use crate::subtitle_processor::SubtitleEntry;

/// Translated lines keyed by entry index
pub type BatchTranslation = HashMap<u32, Vec<String>>;

/// Common trait for all translation providers
///
/// A provider translates one batch of entries and answers with the translated
/// lines keyed by entry index. Indices it leaves out keep their original text.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Short provider identifier used in logs
    fn name(&self) -> &str;

    /// Translate one batch into the target language
    ///
    /// # Arguments
    /// * `batch` - Entries to translate, in document order
    /// * `target_language` - Target language as requested by the caller
    async fn translate_batch(
        &self,
        batch: &[SubtitleEntry],
        target_language: &str,
    ) -> Result<BatchTranslation, ProviderError>;
}

/// Reject blank target languages before any remote call
pub(crate) fn require_target_language(target_language: &str) -> Result<&str, ProviderError> {
    let trimmed = target_language.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::Configuration("Target language is required.".to_string()));
    }
    Ok(trimmed)
}

/// Build the provider selected in the translation config
pub fn from_config(config: &TranslationConfig) -> Result<Arc<dyn TranslationProvider>> {
    let provider_config = config.get_active_provider_config();
    let timeout_secs = provider_config.map(|p| p.timeout_secs).unwrap_or(60);

    let provider: Arc<dyn TranslationProvider> = match config.provider {
        ProviderKind::Anthropic => {
            let api_key = config.get_api_key();
            if api_key.is_empty() {
                return Err(anyhow!("Translation API key is required for Anthropic provider"));
            }
            Arc::new(anthropic::Anthropic::new(
                api_key,
                config.get_endpoint(),
                config.get_model(),
                timeout_secs,
            )
            .with_system_prompt(config.system_prompt.clone()))
        }
        ProviderKind::DeepL => {
            let api_key = config.get_api_key();
            if api_key.is_empty() {
                return Err(anyhow!("Translation API key is required for DeepL provider"));
            }
            Arc::new(deepl::DeepL::new(api_key, config.get_endpoint(), timeout_secs)?)
        }
        ProviderKind::Mock => Arc::new(mock::MockProvider::working()),
    };

    Ok(provider)
}

pub mod anthropic;
pub mod deepl;
pub mod mock;
