//! Denylist configuration.

use serde::Deserialize;

/// Identities watched when they use dispatching commands.
///
/// A hit never blocks the command; it only alerts the operations channel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DenylistConfig {
    /// Nickname fragments, matched case-insensitively anywhere in the
    /// sender's nickname after confusable characters are normalised.
    #[serde(default)]
    pub nicknames: Vec<String>,
    /// Services account names, matched exactly.
    #[serde(default)]
    pub accounts: Vec<String>,
}

impl DenylistConfig {
    pub fn is_empty(&self) -> bool {
        self.nicknames.is_empty() && self.accounts.is_empty()
    }
}
