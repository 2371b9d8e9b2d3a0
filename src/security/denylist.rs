//! Denylist matching.
//!
//! Nickname fragments are matched anywhere in a sender's nickname, case
//! insensitively, after both sides have confusable characters replaced by
//! their Latin lookalikes (so a Cyrillic `а` cannot dodge a fragment written
//! with a Latin `a`). Accounts are matched exactly.

use crate::config::DenylistConfig;
use crate::message::Sender;
use aho_corasick::AhoCorasick;
use confusables::Confusable;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Why a sender matched the denylist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenylistHit {
    /// The nickname contains this configured fragment.
    Nickname(String),
    Account(String),
}

impl fmt::Display for DenylistHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nickname(fragment) => write!(f, "nickname matches '{fragment}'"),
            Self::Account(account) => write!(f, "account '{account}'"),
        }
    }
}

/// Compiled denylist.
pub struct Denylist {
    /// Aho-Corasick automaton over normalised nickname fragments
    nickname_matcher: Option<AhoCorasick>,
    /// Fragments as configured, indexed by pattern id
    fragments: Vec<String>,
    accounts: HashSet<String>,
}

/// Lowercase and replace confusable characters.
fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let lowered: &str = &lowered;
    lowered.detect_replace_confusable().to_lowercase()
}

impl Denylist {
    pub fn new(config: &DenylistConfig) -> Self {
        let fragments: Vec<String> = config
            .nicknames
            .iter()
            .filter(|fragment| !fragment.trim().is_empty())
            .cloned()
            .collect();
        let patterns: Vec<String> = fragments.iter().map(|f| normalize(f)).collect();

        let nickname_matcher = if patterns.is_empty() {
            None
        } else {
            match AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(&patterns)
            {
                Ok(matcher) => Some(matcher),
                Err(err) => {
                    warn!(
                        error = ?err,
                        "Failed to build denylist matcher; nickname matching disabled"
                    );
                    None
                }
            }
        };

        Self {
            nickname_matcher,
            fragments,
            accounts: config.accounts.iter().cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nickname_matcher.is_none() && self.accounts.is_empty()
    }

    /// Check a sender. Accounts are checked before nicknames.
    pub fn check(&self, sender: &Sender) -> Option<DenylistHit> {
        if let Some(ref account) = sender.account {
            if self.accounts.contains(account) {
                return Some(DenylistHit::Account(account.clone()));
            }
        }

        let matcher = self.nickname_matcher.as_ref()?;
        let nickname = normalize(&sender.nickname);
        matcher.find(&nickname).map(|found| {
            DenylistHit::Nickname(self.fragments[found.pattern().as_usize()].clone())
        })
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(&DenylistConfig::default())
    }
}
