//! Chat line lexer.
//!
//! Turns a chat line into a flat token stream using an explicit three-state
//! machine. The machine looks at most one character ahead.
//!
//! ```text
//!            !ident            -x                non-identifier
//! Command ----------> Parameters ----> ParsingOptions ---------> Parameters
//! ```
//!
//! | state            | input                    | token                   |
//! |------------------|--------------------------|-------------------------|
//! | `Command`        | `!` + identifier char    | `Command`               |
//! | `Parameters`     | whitespace               | `Delimiter`             |
//! | `Parameters`     | `--name`                 | `Argument(name)`        |
//! | `Parameters`     | `-` + identifier char    | `Delimiter`, → options  |
//! | `Parameters`     | `` ` `` / `"` quoted run | `Parameter(quoted)`     |
//! | `Parameters`     | anything else            | `Parameter`             |
//! | `ParsingOptions` | identifier char          | `Option(c)`             |
//! | `ParsingOptions` | anything else            | `Delimiter`, → params   |

use crate::colors::FormattedStringExt;
use crate::command::CommandToken;
use crate::error::{LexError, Result};

/// A single lexical unit of a chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    /// The leading `!command[-xx]` token.
    Command(CommandToken),
    /// Separator between other tokens.
    Delimiter,
    /// A single-character option from a `-abc` run.
    Option(char),
    /// A lowercased `--name` argument.
    Argument(String),
    /// A positional parameter.
    Parameter {
        /// Parameter text, without surrounding quotes.
        text: String,
        /// Whether the parameter was written in backticks or double quotes.
        quoted: bool,
    },
}

impl Token {
    /// Shorthand for an unquoted parameter token.
    pub fn parameter(text: impl Into<String>) -> Self {
        Self::Parameter {
            text: text.into(),
            quoted: false,
        }
    }

    /// Shorthand for a quoted parameter token.
    pub fn quoted(text: impl Into<String>) -> Self {
        Self::Parameter {
            text: text.into(),
            quoted: true,
        }
    }
}

/// Lexer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Expecting the command token.
    Command,
    /// Between parameters.
    Parameters,
    /// Inside a `-abc` option run.
    ParsingOptions,
}

/// Characters allowed in command names, options and argument names.
#[inline]
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '@'
}

/// Finite-state lexer over one chat line.
#[derive(Debug)]
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    state: LexState,
}

impl Lexer {
    /// Prepare a lexer for `body`, stripping IRC formatting and surrounding
    /// whitespace.
    pub fn new(body: &str) -> Self {
        let stripped = body.strip_formatting();
        Self {
            chars: stripped.trim().chars().collect(),
            pos: 0,
            state: LexState::Command,
        }
    }

    /// Current state of the machine.
    pub fn state(&self) -> LexState {
        self.state
    }

    /// Run the machine to the end of input.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(c) = self.current() {
            let token = match self.state {
                LexState::Command => self.lex_command(c)?,
                LexState::Parameters => self.lex_parameters(c)?,
                LexState::ParsingOptions => self.lex_option(c),
            };
            tokens.push(token);
        }

        if tokens.is_empty() {
            return Err(LexError::NoCommand);
        }
        Ok(tokens)
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn lookahead(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    /// Read the run of non-whitespace characters starting at the cursor.
    fn read_word(&mut self) -> String {
        let start = self.pos;
        while self.current().is_some_and(|c| !c.is_whitespace()) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn lex_command(&mut self, c: char) -> Result<Token> {
        if c != '!' || !self.lookahead().is_some_and(is_identifier_char) {
            return Err(LexError::NoCommand);
        }

        let raw = self.read_word();
        let command = CommandToken::parse(&raw)?;
        self.state = LexState::Parameters;
        Ok(Token::Command(command))
    }

    fn lex_parameters(&mut self, c: char) -> Result<Token> {
        if c.is_whitespace() {
            self.pos += 1;
            return Ok(Token::Delimiter);
        }

        if c == '-' {
            match self.lookahead() {
                Some('-') => return self.lex_argument(),
                Some(next) if is_identifier_char(next) => {
                    self.pos += 1;
                    self.state = LexState::ParsingOptions;
                    return Ok(Token::Delimiter);
                }
                None => return Err(LexError::InvalidOption { position: self.pos }),
                Some(_) => {}
            }
        }

        self.lex_parameter(c)
    }

    fn lex_argument(&mut self) -> Result<Token> {
        while self.current() == Some('-') {
            self.pos += 1;
        }

        match self.current() {
            Some(c) if !c.is_whitespace() => Ok(Token::Argument(self.read_word().to_lowercase())),
            _ => Err(LexError::InvalidOption { position: self.pos }),
        }
    }

    fn lex_option(&mut self, c: char) -> Token {
        self.pos += 1;
        if is_identifier_char(c) {
            Token::Option(c)
        } else {
            self.state = LexState::Parameters;
            Token::Delimiter
        }
    }

    fn lex_parameter(&mut self, c: char) -> Result<Token> {
        if c != '`' && c != '"' {
            return Ok(Token::parameter(self.read_word()));
        }

        let opening = self.pos;
        self.pos += 1;
        let start = self.pos;
        while self.current().is_some_and(|next| next != c) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(LexError::InvalidArgument { position: opening });
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        if self.current() == Some(c) {
            self.pos += 1;
        }
        Ok(Token::quoted(text))
    }
}

/// Lex a chat line into tokens.
///
/// ```
/// use squeak_proto::{lex, Token};
///
/// let tokens = lex("!sysc -x Alioth").unwrap();
/// assert_eq!(tokens.len(), 6);
/// assert_eq!(tokens[3], Token::Option('x'));
/// ```
pub fn lex(body: &str) -> Result<Vec<Token>> {
    Lexer::new(body).tokenize()
}
