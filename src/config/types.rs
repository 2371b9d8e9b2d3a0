//! Core configuration types.

use serde::Deserialize;
use squeak_proto::CaseMapping;
use std::path::Path;
use thiserror::Error;

use super::console::ConsoleConfig;
use super::defaults::{default_locale, default_nickname};
use super::dispatch::DispatchConfig;
use super::security::DenylistConfig;
use super::validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot identity.
    pub bot: BotConfig,
    /// Dispatch policy.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Monitored identities.
    #[serde(default)]
    pub denylist: DenylistConfig,
    /// Console driver identity.
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(content)?;
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// The bot's own nickname.
    #[serde(default = "default_nickname")]
    pub nickname: String,
    /// Locale used when a command carries no `-xx` suffix.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Port for the Prometheus `/metrics` endpoint. Disabled when unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,
    /// Case folding used to compare nicknames and channels.
    #[serde(default)]
    pub casemapping: CaseMapping,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            nickname: default_nickname(),
            default_locale: default_locale(),
            metrics_port: None,
            casemapping: CaseMapping::default(),
        }
    }
}
