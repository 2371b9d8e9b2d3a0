//! Property-based tests for the lexer.
//!
//! Uses proptest to generate random chat lines and verify that:
//! 1. Formatting stripping is idempotent
//! 2. Lexing never panics and never yields an empty token stream
//! 3. Built invocations keep parameters and quote flags in step

use proptest::prelude::*;
use squeak_proto::{lex, FormattedStringExt, NoSchema, ParsedCommand, Token};

// =============================================================================
// STRATEGIES
// =============================================================================

/// Arbitrary text sprinkled with IRC formatting codes.
fn formatted_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::string::string_regex("[a-zA-Z0-9 ,!\"`-]{0,8}").expect("valid regex"),
            Just("\x02".to_string()),
            Just("\x03".to_string()),
            Just("\x0304,12".to_string()),
            Just("\x04FFAA00".to_string()),
            Just("\x0F".to_string()),
            Just("\x1D".to_string()),
            Just("\x1F".to_string()),
        ],
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

/// A command line built from plausible words.
fn command_line_strategy() -> impl Strategy<Value = String> {
    (
        prop::string::string_regex("[a-z]{1,8}(-[a-z]{2})?").expect("valid regex"),
        prop::collection::vec(
            prop_oneof![
                prop::string::string_regex("[A-Za-z0-9]{1,6}").expect("valid regex"),
                prop::string::string_regex("\"[A-Za-z0-9 ]{1,6}\"").expect("valid regex"),
                prop::string::string_regex("-[a-z]{1,3}").expect("valid regex"),
                prop::string::string_regex("--[a-z]{1,5}").expect("valid regex"),
            ],
            0..6,
        ),
    )
        .prop_map(|(name, words)| {
            let mut line = format!("!{name}");
            for word in words {
                line.push(' ');
                line.push_str(&word);
            }
            line
        })
}

proptest! {
    #[test]
    fn strip_is_idempotent(text in formatted_text_strategy()) {
        let once = text.as_str().strip_formatting().into_owned();
        let twice = once.as_str().strip_formatting().into_owned();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn lexing_never_panics(text in "\\PC{0,40}") {
        if let Ok(tokens) = lex(&text) {
            prop_assert!(!tokens.is_empty());
            prop_assert!(matches!(tokens[0], Token::Command(_)));
        }
    }

    #[test]
    fn command_lines_always_lex(line in command_line_strategy()) {
        let tokens = lex(&line);
        prop_assert!(tokens.is_ok(), "failed on {:?}", line);
    }

    #[test]
    fn quote_flags_track_parameters(line in command_line_strategy()) {
        let parsed = ParsedCommand::parse(&line, &NoSchema).expect("generated lines lex");
        prop_assert_eq!(parsed.parameters.len(), parsed.quoted.len());
        prop_assert!(parsed.command.identifier.chars().all(|c| c.is_ascii_lowercase()));
    }
}
