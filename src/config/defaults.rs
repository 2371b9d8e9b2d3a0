//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use squeak_proto::DEFAULT_LANGUAGE;

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_nickname() -> String {
    "MechaSqueak[BOT]".to_string()
}

pub fn default_locale() -> String {
    DEFAULT_LANGUAGE.to_string()
}

// =============================================================================
// Dispatch Defaults
// =============================================================================

/// How long a sender's identical command counts as a repeat.
pub fn default_repeat_window_secs() -> u64 {
    30
}

/// Invocations kept for cooldown and repeat lookups.
pub fn default_history_capacity() -> usize {
    250
}

// =============================================================================
// Console Defaults
// =============================================================================

pub fn default_console_nickname() -> String {
    "console".to_string()
}

pub fn default_console_channel() -> String {
    "#fuelrats".to_string()
}
