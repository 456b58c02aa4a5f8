use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::translation::concurrency::{FailurePolicy, OrchestratorLimits, ProviderProfile};
use crate::translation::prompts::DEFAULT_SYSTEM_PROMPT;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language (ISO code or language name)
    pub target_language: String,

    /// Directory for translated files; the user's home directory when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: Anthropic messages API
    Anthropic,
    // @provider: DeepL REST API
    DeepL,
    // @provider: In-process mock, no network
    #[default]
    Mock,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Anthropic => "Anthropic",
            Self::DeepL => "DeepL",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Anthropic => "anthropic".to_string(),
            Self::DeepL => "deepl".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }

    /// Whether the provider talks to a remote API and needs a key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Mock)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "deepl" => Ok(Self::DeepL),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (LLM providers only)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: HTTP timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: ProviderKind) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(provider_type),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: ProviderKind,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Maximum entries sent in one provider call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Approximate payload budget of one provider call
    #[serde(default = "default_max_batch_chars")]
    pub max_batch_chars: usize,

    /// Maximum provider calls in flight
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Optional deadline for a single provider call
    #[serde(default)]
    pub batch_timeout_secs: Option<u64>,

    /// What happens to in-flight batches after one fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// System prompt template for LLM providers
    /// Placeholder: {{TARGET_LANGUAGE}}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_batch_size() -> usize {
    40
}

fn default_max_batch_chars() -> usize {
    12_000
}

fn default_max_parallel() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_model(provider: ProviderKind) -> String {
    match provider {
        ProviderKind::Anthropic => "claude-3-haiku-20240307".to_string(),
        ProviderKind::DeepL | ProviderKind::Mock => String::new(),
    }
}

fn default_endpoint(provider: ProviderKind) -> String {
    match provider {
        ProviderKind::Anthropic => "https://api.anthropic.com".to_string(),
        ProviderKind::DeepL => "https://api-free.deepl.com".to_string(),
        ProviderKind::Mock => String::new(),
    }
}

impl Config {
    /// Load a config file, writing a default one when it does not exist yet.
    ///
    /// A freshly written config is tuned for `provider` when one is given.
    pub fn load_or_create<P: AsRef<Path>>(path: P, provider: Option<ProviderKind>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let mut config = Config::default();
        if let Some(provider) = provider {
            config.translation = TranslationConfig::for_provider(provider);
        }
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language is required."));
        }

        let provider = self.translation.provider;
        if provider.requires_api_key() && self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                provider.display_name()
            ));
        }

        Ok(())
    }

    /// Directory translated files are written to
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: "fr".to_string(),
            output_dir: None,
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &ProviderKind) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration
    pub fn get_active_provider_config_mut(&mut self) -> Option<&mut ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter_mut()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.model.clone())
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| default_model(self.provider))
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.endpoint.clone())
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| default_endpoint(self.provider))
    }

    /// Orchestration limits, clamped to safe values
    pub fn limits(&self) -> OrchestratorLimits {
        OrchestratorLimits::new(self.batch_size, self.max_batch_chars, self.max_parallel)
            .with_batch_timeout_secs(self.batch_timeout_secs)
            .with_failure_policy(self.failure_policy)
    }

    /// Defaults tuned for one provider
    pub fn for_provider(provider: ProviderKind) -> Self {
        let profile = ProviderProfile::for_provider(provider);
        Self {
            provider,
            batch_size: profile.recommended_batch_size,
            max_batch_chars: profile.recommended_batch_chars,
            max_parallel: profile.max_concurrent_requests,
            ..Self::default()
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            available_providers: vec![
                ProviderConfig::new(ProviderKind::Anthropic),
                ProviderConfig::new(ProviderKind::DeepL),
                ProviderConfig::new(ProviderKind::Mock),
            ],
            batch_size: default_batch_size(),
            max_batch_chars: default_max_batch_chars(),
            max_parallel: default_max_parallel(),
            batch_timeout_secs: None,
            failure_policy: FailurePolicy::default(),
            system_prompt: default_system_prompt(),
        }
    }
}
