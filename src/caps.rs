//! Sender capabilities.
//!
//! A capability is a named permission held by a chat user, resolved by the
//! surrounding application from their account (vhost, group membership, ...).
//! Declarations name the capability they require; the dispatcher checks it
//! against the [`CapabilitySet`] carried by the message sender.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A permission a sender may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Verified rescue team member.
    Rescue,
    /// May read the rescue board.
    DispatchRead,
    /// May modify the rescue board.
    DispatchWrite,
    /// Senior dispatcher.
    Overseer,
    /// Technical support team.
    TechRat,
    /// Network or bot administrator. Grants every other capability.
    Admin,
    /// Not subject to command cooldowns.
    CooldownBypass,
    /// May use channel-only commands in private messages and vice versa.
    DestinationBypass,
}

impl Capability {
    /// Stable name used in config files and reply interpolation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rescue => "rescue",
            Self::DispatchRead => "dispatch_read",
            Self::DispatchWrite => "dispatch_write",
            Self::Overseer => "overseer",
            Self::TechRat => "tech_rat",
            Self::Admin => "admin",
            Self::CooldownBypass => "cooldown_bypass",
            Self::DestinationBypass => "destination_bypass",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The capabilities held by one sender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    pub fn insert(&mut self, capability: Capability) -> bool {
        self.0.insert(capability)
    }

    /// Whether this set grants `capability`, directly or through `Admin`.
    pub fn grants(&self, capability: Capability) -> bool {
        self.0.contains(&capability) || self.0.contains(&Capability::Admin)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants_direct() {
        let caps = CapabilitySet::new().with(Capability::Rescue);
        assert!(caps.grants(Capability::Rescue));
        assert!(!caps.grants(Capability::Overseer));
    }

    #[test]
    fn test_admin_grants_everything() {
        let caps: CapabilitySet = [Capability::Admin].into_iter().collect();
        assert!(caps.grants(Capability::DispatchWrite));
        assert!(caps.grants(Capability::CooldownBypass));
    }

    #[test]
    fn test_deserialize_from_names() {
        #[derive(Deserialize)]
        struct Holder {
            caps: CapabilitySet,
        }
        let holder: Holder = toml::from_str(r#"caps = ["rescue", "tech_rat"]"#).unwrap();
        assert!(holder.caps.grants(Capability::TechRat));
        assert_eq!(holder.caps.iter().count(), 2);
        assert_eq!(Capability::TechRat.to_string(), "tech_rat");
    }
}
