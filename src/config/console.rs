//! Console driver identity.

use serde::Deserialize;

use super::defaults::{default_console_channel, default_console_nickname};
use crate::caps::CapabilitySet;

/// Who the console driver speaks as, and where.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_console_nickname")]
    pub nickname: String,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub capabilities: CapabilitySet,
    /// Channel lines are said in. Lines starting with `/msg ` are sent
    /// privately instead.
    #[serde(default = "default_console_channel")]
    pub channel: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            nickname: default_console_nickname(),
            account: None,
            capabilities: CapabilitySet::new(),
            channel: default_console_channel(),
        }
    }
}
