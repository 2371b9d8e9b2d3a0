//! Unified error handling for MechaSqueak.
//!
//! Lexing errors live in `squeak_proto`; this module holds everything above
//! the lexer: validation rejections shown to users, handler failures, and
//! registration mistakes caught at startup.

use crate::caps::Capability;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Rejections (validation failures reported to the sender)
// ============================================================================

/// Why an invocation of a registered command was refused.
///
/// Rejections are structured so the presentation layer can render them in
/// any language: [`reason_code`](Self::reason_code) selects the message and
/// [`interpolation`](Self::interpolation) supplies its placeholders. The
/// `Display` impl is the English fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("!{command}: unrecognized arguments {}. Usage: !{command} {usage}", format_arguments(.arguments))]
    IllegalArguments {
        command: String,
        arguments: Vec<String>,
        usage: String,
        example: String,
    },

    #[error("!{command}: unrecognized options {}. Usage: !{command} {usage}", format_options(.options))]
    IllegalOptions {
        command: String,
        options: Vec<char>,
        usage: String,
        example: String,
    },

    /// Two illegal options that spell a language code, e.g. `!prep -fr`.
    #[error("!{command}: unrecognized options {}. Did you mean !{command}-{locale}?", format_options(.options))]
    IllegalOptionsMaybeLocale {
        command: String,
        options: Vec<char>,
        locale: String,
        usage: String,
        example: String,
    },

    #[error("!{command} can only be used in a channel")]
    ChannelOnly { command: String },

    #[error("!{command} can only be used in a private message")]
    PrivateMessageOnly { command: String },

    #[error("!{command}: not enough parameters. Usage: !{command} {usage}. Example: !{command} {example}")]
    TooFewParameters {
        command: String,
        usage: String,
        example: String,
    },

    #[error("!{command}: too many parameters. Usage: !{command} {usage}. Example: !{command} {example}")]
    TooManyParameters {
        command: String,
        usage: String,
        example: String,
    },

    #[error("!{command} was used recently in this channel, please wait {} seconds", ceil_secs(.remaining))]
    Cooldown { command: String, remaining: Duration },

    #[error("!{command} requires the {required} permission")]
    PermissionDenied {
        command: String,
        required: Capability,
    },
}

impl Rejection {
    /// Get a static reason code for localization lookup and metrics labeling.
    #[inline]
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::IllegalArguments { .. } => "illegal_arguments",
            Self::IllegalOptions { .. } => "illegal_options",
            Self::IllegalOptionsMaybeLocale { .. } => "illegal_options_maybe_locale",
            Self::ChannelOnly { .. } => "channel_only",
            Self::PrivateMessageOnly { .. } => "private_message_only",
            Self::TooFewParameters { .. } => "too_few_parameters",
            Self::TooManyParameters { .. } => "too_many_parameters",
            Self::Cooldown { .. } => "cooldown",
            Self::PermissionDenied { .. } => "permission_denied",
        }
    }

    /// The canonical name of the rejected command.
    pub fn command(&self) -> &str {
        match self {
            Self::IllegalArguments { command, .. }
            | Self::IllegalOptions { command, .. }
            | Self::IllegalOptionsMaybeLocale { command, .. }
            | Self::ChannelOnly { command }
            | Self::PrivateMessageOnly { command }
            | Self::TooFewParameters { command, .. }
            | Self::TooManyParameters { command, .. }
            | Self::Cooldown { command, .. }
            | Self::PermissionDenied { command, .. } => command,
        }
    }

    /// Placeholder values for the localized message.
    ///
    /// Every map has `command`; the other keys depend on the variant:
    /// `usage`, `example`, `illegal`, `locale`, `remaining` (whole seconds,
    /// rounded up) and `permission`.
    pub fn interpolation(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        map.insert("command", self.command().to_string());

        match self {
            Self::IllegalArguments {
                arguments,
                usage,
                example,
                ..
            } => {
                map.insert("illegal", format_arguments(arguments));
                map.insert("usage", usage.clone());
                map.insert("example", example.clone());
            }
            Self::IllegalOptions {
                options,
                usage,
                example,
                ..
            } => {
                map.insert("illegal", format_options(options));
                map.insert("usage", usage.clone());
                map.insert("example", example.clone());
            }
            Self::IllegalOptionsMaybeLocale {
                options,
                locale,
                usage,
                example,
                ..
            } => {
                map.insert("illegal", format_options(options));
                map.insert("locale", locale.clone());
                map.insert("usage", usage.clone());
                map.insert("example", example.clone());
            }
            Self::TooFewParameters { usage, example, .. }
            | Self::TooManyParameters { usage, example, .. } => {
                map.insert("usage", usage.clone());
                map.insert("example", example.clone());
            }
            Self::Cooldown { remaining, .. } => {
                map.insert("remaining", ceil_secs(remaining).to_string());
            }
            Self::PermissionDenied { required, .. } => {
                map.insert("permission", required.to_string());
            }
            Self::ChannelOnly { .. } | Self::PrivateMessageOnly { .. } => {}
        }

        map
    }

    /// Whether the rejection is sent to the sender privately rather than to
    /// where the command was used.
    pub fn is_private(&self) -> bool {
        matches!(
            self,
            Self::Cooldown { .. } | Self::PrivateMessageOnly { .. } | Self::PermissionDenied { .. }
        )
    }
}

/// Whole seconds, rounded up.
fn ceil_secs(duration: &Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn format_arguments(arguments: &[String]) -> String {
    arguments
        .iter()
        .map(|name| format!("--{name}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_options(options: &[char]) -> String {
    let mut out = String::with_capacity(options.len() + 1);
    out.push('-');
    out.extend(options.iter());
    out
}

// ============================================================================
// Handler Errors
// ============================================================================

/// Errors returned by command handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The outgoing reply queue was closed. The reply is lost.
    #[error("reply channel closed")]
    ChannelClosed,

    #[error("reply send timed out after {0:?}")]
    SendTimeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ChannelClosed => "channel_closed",
            Self::SendTimeout(_) => "send_timeout",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Registry Errors (startup configuration mistakes)
// ============================================================================

/// Problems with a command declaration or its registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The name is already taken. The earlier registrant keeps it.
    #[error("command name !{name} is already registered by !{existing}")]
    DuplicateName { name: String, existing: String },

    #[error("command declaration has no names")]
    EmptyNames,

    /// Names must be non-empty lowercase `[a-z0-9_]`.
    #[error("invalid command name '{0}'")]
    InvalidName(String),

    #[error("!{command}: a continuous or multiple parameter must be the last parameter")]
    MisplacedTrailingParameter { command: String },

    #[error("!{command}: options may only be declared once")]
    MultipleOptionSpecs { command: String },
}

impl RegistryError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateName { .. } => "duplicate_name",
            Self::EmptyNames => "empty_names",
            Self::InvalidName(_) => "invalid_name",
            Self::MisplacedTrailingParameter { .. } => "misplaced_trailing_parameter",
            Self::MultipleOptionSpecs { .. } => "multiple_option_specs",
        }
    }
}
