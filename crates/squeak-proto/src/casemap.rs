//! Nickname and channel case folding.
//!
//! Networks advertise a `CASEMAPPING`. Under `rfc1459` the characters
//! `[]\~` are the uppercase forms of `{}|^`, so `Rat[PC]` and `rat{pc}` are the
//! same nickname.

/// Case mapping used to compare nicknames and channel names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CaseMapping {
    /// Only `A-Z` fold.
    Ascii,
    /// `A-Z` plus `[]\~` fold.
    #[default]
    Rfc1459,
}

impl CaseMapping {
    /// Fold a single character.
    #[inline]
    pub const fn fold_char(self, c: char) -> char {
        match (self, c) {
            (_, 'A'..='Z') => (c as u8 + 32) as char,
            (Self::Rfc1459, '[') => '{',
            (Self::Rfc1459, ']') => '}',
            (Self::Rfc1459, '\\') => '|',
            (Self::Rfc1459, '~') => '^',
            _ => c,
        }
    }

    /// Fold a whole string.
    pub fn fold(self, s: &str) -> String {
        s.chars().map(|c| self.fold_char(c)).collect()
    }

    /// Compare two names under this mapping.
    pub fn equals(self, a: &str, b: &str) -> bool {
        a.len() == b.len()
            && a
                .chars()
                .zip(b.chars())
                .all(|(ca, cb)| self.fold_char(ca) == self.fold_char(cb))
    }
}
