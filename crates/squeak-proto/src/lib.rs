//! # squeak-proto
//!
//! Parsing of chat-line command invocations for the MechaSqueak IRC bot.
//!
//! ## Features
//!
//! - IRC formatting code stripping (colors, bold, italic, ...)
//! - A finite-state lexer producing typed tokens
//! - `!command-xx` token parsing with locale suffixes
//! - Invocation building with declaration-aware named arguments
//! - ISO 639-1 language code lookup
//! - Nickname/channel case folding
//!
//! The crate performs no I/O.

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ```rust
//! use squeak_proto::{ParsedCommand, Token, lex};
//!
//! let tokens = lex("!sysc \x02Col 285\x02").expect("a command line");
//! assert!(matches!(tokens[0], Token::Command(_)));
//!
//! let accepted: &[&str] = &["from"];
//! let parsed = ParsedCommand::parse("!quote --from Dawg 2", accepted).unwrap();
//! assert_eq!(parsed.argument("from"), Some("Dawg 2"));
//! ```

pub mod casemap;
pub mod colors;
pub mod command;
pub mod error;
pub mod invocation;
pub mod lexer;
pub mod locale;

pub use self::casemap::CaseMapping;
pub use self::colors::FormattedStringExt;
pub use self::command::CommandToken;
pub use self::error::LexError;
pub use self::invocation::{leading_command, ArgumentSchema, NoSchema, OptionSet, ParsedCommand};
pub use self::lexer::{is_identifier_char, lex, LexState, Lexer, Token};
pub use self::locale::{is_language_code, language_from_options, DEFAULT_LANGUAGE};
