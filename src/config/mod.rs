//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, BotConfig, ConfigError)
//! - [`dispatch`]: Dispatch policy (drill mode, cooldown exemptions, history)
//! - [`security`]: Denylist configuration
//! - [`console`]: Identity used by the console driver
//! - [`defaults`]: Serde default functions
//! - [`validation`]: Startup validation

mod console;
mod defaults;
mod dispatch;
mod security;
mod types;
mod validation;

pub use console::ConsoleConfig;
pub use dispatch::DispatchConfig;
pub use security::DenylistConfig;
pub use types::{BotConfig, Config, ConfigError};
pub use validation::{ValidationError, validate};
