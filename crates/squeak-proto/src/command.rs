//! Command token parsing.
//!
//! A command token is the first word of a chat line, `!<identifier>` with an
//! optional `-<language>` suffix selecting the reply locale:
//!
//! ```text
//! !sysc          -> ("sysc", None)
//! !fact-FR       -> ("fact", Some("fr"))
//! !prep-x        -> ("prep", None)
//! ```

use nom::{
    bytes::complete::{take_while, take_while_m_n},
    character::complete::char,
    combinator::opt,
    sequence::preceded,
    IResult,
};

use crate::error::{LexError, Result};

/// The command name and optional locale suffix of a chat line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandToken {
    /// Lowercased command identifier, without the leading `!`.
    pub identifier: String,
    /// Lowercased language code from a `-xx` suffix, if present.
    pub language: Option<String>,
}

impl CommandToken {
    /// Parse the raw text of a command token.
    ///
    /// Only the start of `raw` has to match; trailing characters that fit
    /// neither group are ignored. An empty identifier is rejected.
    ///
    /// ```
    /// use squeak_proto::CommandToken;
    ///
    /// let token = CommandToken::parse("!Fact-DE").unwrap();
    /// assert_eq!(token.identifier, "fact");
    /// assert_eq!(token.language.as_deref(), Some("de"));
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let (_rest, (identifier, language)) =
            parse_command_token(raw).map_err(|_| LexError::NoCommand)?;

        if identifier.is_empty() {
            return Err(LexError::NoCommand);
        }

        Ok(Self {
            identifier: identifier.to_ascii_lowercase(),
            language: language.map(str::to_ascii_lowercase),
        })
    }
}

/// Identifier characters accepted in a command name.
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

/// `-` followed by two or more ASCII letters.
fn parse_language(input: &str) -> IResult<&str, &str> {
    preceded(
        char('-'),
        take_while_m_n(2, usize::MAX, |c: char| c.is_ascii_alphabetic()),
    )(input)
}

fn parse_command_token(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, _) = char('!')(input)?;
    let (input, identifier) = parse_identifier(input)?;
    let (input, language) = opt(parse_language)(input)?;
    Ok((input, (identifier, language)))
}
