//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{VocabError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_state_config(&settings.state)?;
    validate_translator_config(&settings.translator)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(VocabError::Config(
            "Bot token is required".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(VocabError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(VocabError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(VocabError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    if config.acquire_timeout_seconds == 0 {
        return Err(VocabError::Config(
            "Database acquire timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(VocabError::Config(
            "Redis URL is required".to_string()
        ));
    }

    Ok(())
}

fn validate_state_config(config: &super::StateConfig) -> Result<()> {
    if config.pending_ttl_seconds == 0 {
        return Err(VocabError::Config(
            "Pending translation TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate translation provider configuration
fn validate_translator_config(config: &super::TranslatorConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(VocabError::Config(
            "Translator API URL is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(VocabError::Config(
            "Translator timeout must be greater than 0".to_string()
        ));
    }

    if config.source_language.is_empty() || config.target_language.is_empty() {
        return Err(VocabError::Config(
            "Source and target languages are required".to_string()
        ));
    }

    if config.source_language == config.target_language {
        return Err(VocabError::Config(
            format!("Source and target languages must differ (both are {})", config.source_language)
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(VocabError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(VocabError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
