//! Error types for command lexing.
//!
//! Every variant means "this line is not a command invocation". Callers treat
//! them as ordinary chat and never surface them to the sender.

use thiserror::Error;

/// Convenience type alias for Results using [`LexError`].
pub type Result<T, E = LexError> = std::result::Result<T, E>;

/// Errors produced while turning a chat line into tokens.
///
/// Positions are character offsets into the stripped, trimmed line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LexError {
    /// The line does not begin with a `!identifier` command token.
    #[error("line does not start with a command")]
    NoCommand,

    /// A dash-prefixed option or argument run has nothing after the dashes.
    #[error("malformed option at position {position}")]
    InvalidOption {
        /// Offset of the character that ended the run.
        position: usize,
    },

    /// A quoted parameter contains no characters.
    #[error("empty quoted parameter at position {position}")]
    InvalidArgument {
        /// Offset of the opening quote.
        position: usize,
    },
}

impl LexError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoCommand => "no_command",
            Self::InvalidOption { .. } => "invalid_option",
            Self::InvalidArgument { .. } => "invalid_argument",
        }
    }
}
