//! IRC formatting code handling.
//!
//! Chat clients decorate lines with inline control codes. Command lexing
//! operates on the plain text, so these codes are removed first.
//!
//! # IRC Format Codes
//! - 0x02 (^B): Bold
//! - 0x03 (^C): Color (followed by up to two foreground digits, optionally `,` and
//!   up to two background digits)
//! - 0x04: Hex color (followed by six hex digits, optionally `,` and six more)
//! - 0x0F (^O): Reset all formatting
//! - 0x11: Monospace
//! - 0x16 (^V): Reverse/Inverse
//! - 0x1D: Italic
//! - 0x1E: Strikethrough
//! - 0x1F (^_): Underline

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

const COLOR: char = '\x03';
const HEX_COLOR: char = '\x04';

/// IRC format control characters.
const FORMAT_CHARS: &[char] = &[
    '\x02', // Bold
    COLOR,
    HEX_COLOR,
    '\x0F', // Reset
    '\x11', // Monospace
    '\x16', // Reverse
    '\x1D', // Italic
    '\x1E', // Strikethrough
    '\x1F', // Underline
];

/// Extension trait for handling formatted IRC strings.
pub trait FormattedStringExt<'a> {
    /// Check if the string contains any IRC formatting codes.
    fn is_formatted(&self) -> bool;

    /// Strip all IRC formatting codes from the string.
    ///
    /// Returns `Cow::Borrowed` if no formatting was present. Stripping an
    /// already stripped string is a no-op.
    fn strip_formatting(self) -> Cow<'a, str>;
}

impl<'a> FormattedStringExt<'a> for &'a str {
    fn is_formatted(&self) -> bool {
        self.contains(FORMAT_CHARS)
    }

    fn strip_formatting(self) -> Cow<'a, str> {
        if !self.is_formatted() {
            return Cow::Borrowed(self);
        }
        Cow::Owned(strip(self))
    }
}

impl FormattedStringExt<'static> for String {
    fn is_formatted(&self) -> bool {
        self.as_str().is_formatted()
    }

    fn strip_formatting(self) -> Cow<'static, str> {
        if !self.is_formatted() {
            return Cow::Owned(self);
        }
        Cow::Owned(strip(&self))
    }
}

fn strip(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            COLOR => skip_color_arguments(&mut chars, 2, |c| c.is_ascii_digit()),
            HEX_COLOR => skip_color_arguments(&mut chars, 6, |c| c.is_ascii_hexdigit()),
            c if FORMAT_CHARS.contains(&c) => {}
            c => result.push(c),
        }
    }

    result
}

/// Skip `fg[,bg]` after a color code. A comma is only part of the code when
/// a background digit follows it.
fn skip_color_arguments(chars: &mut Peekable<Chars<'_>>, width: usize, digit: fn(char) -> bool) {
    if skip_digits(chars, width, digit) == 0 {
        return;
    }
    if chars.peek() != Some(&',') {
        return;
    }

    let mut ahead = chars.clone();
    ahead.next();
    if ahead.peek().is_some_and(|&c| digit(c)) {
        chars.next();
        skip_digits(chars, width, digit);
    }
}

fn skip_digits(chars: &mut Peekable<Chars<'_>>, max: usize, digit: fn(char) -> bool) -> usize {
    let mut taken = 0;
    while taken < max && chars.peek().is_some_and(|&c| digit(c)) {
        chars.next();
        taken += 1;
    }
    taken
}
