//! Invocation building.
//!
//! Folds a token stream into the parameters, options and named arguments of
//! a single command invocation. Which `--name` arguments take a value is
//! decided by an [`ArgumentSchema`], normally the matched command
//! declaration.

use std::collections::{BTreeMap, HashSet};
use std::iter::Peekable;

use smallvec::SmallVec;

use crate::command::CommandToken;
use crate::error::{LexError, Result};
use crate::lexer::{lex, Token};

/// Decides which named arguments a command accepts.
pub trait ArgumentSchema {
    /// Returns true if `--name` is a known argument.
    fn accepts_argument(&self, name: &str) -> bool;
}

/// Schema for lines whose command has no declaration: every argument is
/// unrecognized.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSchema;

impl ArgumentSchema for NoSchema {
    fn accepts_argument(&self, _name: &str) -> bool {
        false
    }
}

impl ArgumentSchema for HashSet<String> {
    fn accepts_argument(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<V> ArgumentSchema for BTreeMap<String, V> {
    fn accepts_argument(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl ArgumentSchema for [&str] {
    fn accepts_argument(&self, name: &str) -> bool {
        self.contains(&name)
    }
}

/// Options in order of first appearance, without duplicates.
pub type OptionSet = SmallVec<[char; 8]>;

/// The structured result of one chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedCommand {
    /// The leading command token.
    pub command: CommandToken,
    /// Positional parameters, verbatim.
    pub parameters: Vec<String>,
    /// Whether each parameter was quoted. Same length as `parameters`.
    pub quoted: Vec<bool>,
    /// Single-character options.
    pub options: OptionSet,
    /// Named arguments. Unrecognized names and flag-style arguments map to
    /// `None`.
    pub arguments: BTreeMap<String, Option<String>>,
}

impl ParsedCommand {
    /// Build an invocation from a token stream. Delimiters are ignored.
    ///
    /// Fails with [`LexError::NoCommand`] if the stream does not start with a
    /// command token.
    pub fn build<S>(tokens: Vec<Token>, schema: &S) -> Result<Self>
    where
        S: ArgumentSchema + ?Sized,
    {
        let mut tokens = tokens
            .into_iter()
            .filter(|token| *token != Token::Delimiter)
            .peekable();

        let command = match tokens.next() {
            Some(Token::Command(command)) => command,
            _ => return Err(LexError::NoCommand),
        };

        let mut parsed = Self {
            command,
            parameters: Vec::new(),
            quoted: Vec::new(),
            options: OptionSet::new(),
            arguments: BTreeMap::new(),
        };

        while let Some(token) = tokens.next() {
            match token {
                Token::Argument(name) => {
                    let value = if schema.accepts_argument(&name) {
                        take_argument_value(&mut tokens)
                    } else {
                        None
                    };
                    parsed.arguments.insert(name, value);
                }
                Token::Option(option) => {
                    if !parsed.options.contains(&option) {
                        parsed.options.push(option);
                    }
                }
                Token::Parameter { text, quoted } => {
                    parsed.parameters.push(text);
                    parsed.quoted.push(quoted);
                }
                // A second command token cannot be produced by the lexer.
                Token::Command(_) | Token::Delimiter => {}
            }
        }

        Ok(parsed)
    }

    /// Lex and build in one step.
    ///
    /// ```
    /// use squeak_proto::{NoSchema, ParsedCommand};
    ///
    /// let parsed = ParsedCommand::parse("!sysc -f \"Col 285\"", &NoSchema).unwrap();
    /// assert_eq!(parsed.command.identifier, "sysc");
    /// assert_eq!(parsed.parameters, vec!["Col 285"]);
    /// assert_eq!(parsed.options.as_slice(), &['f']);
    /// ```
    pub fn parse<S>(body: &str, schema: &S) -> Result<Self>
    where
        S: ArgumentSchema + ?Sized,
    {
        Self::build(lex(body)?, schema)
    }

    /// Whether `option` was supplied.
    pub fn has_option(&self, option: char) -> bool {
        self.options.contains(&option)
    }

    /// Whether `--name` was supplied, with or without a value.
    pub fn has_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    /// The value of `--name`, if it was supplied with one.
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).and_then(|value| value.as_deref())
    }
}

/// The command token that leads a token stream, if any.
pub fn leading_command(tokens: &[Token]) -> Option<&CommandToken> {
    match tokens.first() {
        Some(Token::Command(command)) => Some(command),
        _ => None,
    }
}

/// Consume the parameters directly following an argument as its value.
fn take_argument_value<I>(tokens: &mut Peekable<I>) -> Option<String>
where
    I: Iterator<Item = Token>,
{
    let mut words = Vec::new();
    while let Some(Token::Parameter { .. }) = tokens.peek() {
        if let Some(Token::Parameter { text, .. }) = tokens.next() {
            words.push(text);
        }
    }

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}
