//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::store::StoreMode;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bot.prefix must not be empty")]
    EmptyPrefix,
    #[error("bot.prefix must not contain whitespace, got '{0}'")]
    PrefixWhitespace(String),
    #[error("pagination.lines_per_page must be at least 1")]
    ZeroPageSize,
    #[error("pagination.timeout_secs must be at least 1")]
    ZeroPageTimeout,
    #[error("pagination emoji must not be empty")]
    EmptyPageEmoji,
    #[error("store.path parent directory does not exist: {0}")]
    StorePathInvalid(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.bot.prefix;
    if prefix.is_empty() {
        errors.push(ValidationError::EmptyPrefix);
    } else if prefix.chars().any(char::is_whitespace) {
        errors.push(ValidationError::PrefixWhitespace(prefix.clone()));
    }

    let pagination = &config.pagination;
    if pagination.lines_per_page == 0 {
        errors.push(ValidationError::ZeroPageSize);
    }
    if pagination.timeout_secs == 0 {
        errors.push(ValidationError::ZeroPageTimeout);
    }
    if pagination.emoji_left.is_empty() || pagination.emoji_right.is_empty() {
        errors.push(ValidationError::EmptyPageEmoji);
    }

    if let StoreMode::Durable(path) = StoreMode::from_path(&config.store.path)
        && let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        errors.push(ValidationError::StorePathInvalid(parent.display().to_string()));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
