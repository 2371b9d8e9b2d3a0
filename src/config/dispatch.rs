//! Dispatch policy configuration.

use serde::Deserialize;

use super::defaults::{default_history_capacity, default_repeat_window_secs};

/// Policy applied by the dispatcher to every invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Drill mode disables cooldowns entirely (training sessions).
    #[serde(default)]
    pub drill_mode: bool,
    /// Channel that receives denylist alerts. No alerts are sent when unset.
    #[serde(default)]
    pub operations_channel: Option<String>,
    /// Channels where cooldowns never apply.
    #[serde(default)]
    pub cooldown_exempt_channels: Vec<String>,
    /// Window within which a sender's identical command is a repeat.
    #[serde(default = "default_repeat_window_secs")]
    pub repeat_window_secs: u64,
    /// Number of invocations kept by the history tracker.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            drill_mode: false,
            operations_channel: None,
            cooldown_exempt_channels: Vec::new(),
            repeat_window_secs: default_repeat_window_secs(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl DispatchConfig {
    /// Repeat window in milliseconds.
    pub fn repeat_window_ms(&self) -> i64 {
        i64::try_from(self.repeat_window_secs.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}
