/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use srt_relay::app_config::{Config, LogLevel, ProviderConfig, ProviderKind, TranslationConfig};
use srt_relay::translation::FailurePolicy;
use crate::common;

#[test]
fn test_load_or_create_should_reload_written_defaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path, None)?;
    let reloaded = Config::load_or_create(&path, Some(ProviderKind::DeepL))?;

    assert_eq!(created.target_language, reloaded.target_language);
    assert_eq!(reloaded.translation.provider, ProviderKind::Mock);
    assert_eq!(reloaded.translation.available_providers.len(), 3);
    Ok(())
}

#[test]
fn test_load_or_create_with_broken_json_should_fail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let err = Config::load_or_create(&path, None).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_config_json_should_read_orchestration_settings() -> Result<()> {
    let json = r#"{
        "target_language": "hu",
        "output_dir": "/srv/subs",
        "translation": {
            "provider": "deepl",
            "available_providers": [
                { "type": "deepl", "api_key": "secret", "endpoint": "" }
            ],
            "batch_size": 25,
            "max_parallel": 6,
            "batch_timeout_secs": 30,
            "failure_policy": "cancel_on_first_failure"
        },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json)?;
    config.validate()?;

    assert_eq!(config.resolved_output_dir(), PathBuf::from("/srv/subs"));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.translation.get_api_key(), "secret");
    assert!(config.translation.get_endpoint().contains("deepl.com"));

    let limits = config.translation.limits();
    assert_eq!(limits.max_entries_per_batch, 25);
    assert_eq!(limits.max_concurrent_batches, 6);
    assert_eq!(limits.batch_timeout, Some(std::time::Duration::from_secs(30)));
    assert_eq!(limits.failure_policy, FailurePolicy::CancelOnFirstFailure);
    Ok(())
}

#[test]
fn test_validate_should_accept_keyed_anthropic_config() {
    let mut translation = TranslationConfig::for_provider(ProviderKind::Anthropic);
    translation.available_providers = vec![ProviderConfig {
        api_key: "sk-test".to_string(),
        ..ProviderConfig::new(ProviderKind::Anthropic)
    }];
    let config = Config {
        target_language: "German".to_string(),
        translation,
        ..Config::default()
    };

    assert!(config.validate().is_ok());
    assert!(!config.translation.get_model().is_empty());
}

#[test]
fn test_saved_config_should_round_trip_through_file() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    let mut config = Config::default();
    config.target_language = "ja".to_string();
    config.translation.max_parallel = 9;
    fs::write(&path, serde_json::to_string_pretty(&config)?)?;

    let loaded = Config::load_or_create(&path, None)?;

    assert_eq!(loaded.target_language, "ja");
    assert_eq!(loaded.translation.max_parallel, 9);
    Ok(())
}
