//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use squeak_proto::is_language_code;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bot.nickname is required")]
    MissingNickname,
    #[error("bot.default_locale must be an ISO 639-1 code, got '{0}'")]
    InvalidLocale(String),
    #[error("dispatch.operations_channel must start with '#' or '&', got '{0}'")]
    InvalidOperationsChannel(String),
    #[error("dispatch.cooldown_exempt_channels entry must start with '#' or '&', got '{0}'")]
    InvalidExemptChannel(String),
    #[error("dispatch.history_capacity must be at least 1")]
    ZeroHistoryCapacity,
    #[error("denylist.nicknames entries must not be empty")]
    EmptyDenylistEntry,
}

fn is_channel_name(name: &str) -> bool {
    name.len() > 1 && (name.starts_with('#') || name.starts_with('&'))
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bot.nickname.trim().is_empty() {
        errors.push(ValidationError::MissingNickname);
    }
    if !is_language_code(&config.bot.default_locale) {
        errors.push(ValidationError::InvalidLocale(config.bot.default_locale.clone()));
    }

    if let Some(ref channel) = config.dispatch.operations_channel {
        if !is_channel_name(channel) {
            errors.push(ValidationError::InvalidOperationsChannel(channel.clone()));
        }
    }
    for channel in &config.dispatch.cooldown_exempt_channels {
        if !is_channel_name(channel) {
            errors.push(ValidationError::InvalidExemptChannel(channel.clone()));
        }
    }
    if config.dispatch.history_capacity == 0 {
        errors.push(ValidationError::ZeroHistoryCapacity);
    }

    // An empty fragment would match every nickname.
    if config
        .denylist
        .nicknames
        .iter()
        .any(|fragment| fragment.trim().is_empty())
    {
        errors.push(ValidationError::EmptyDenylistEntry);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
