//! Keyboard input for the calculator.
//!
//! Maps typed characters to keypad keys. Accepts both the ASCII keys found
//! on a keyboard (`* / -`) and the display symbols (`× ÷ −`).

use crate::calculator::Operator;

/// A key on the calculator keypad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Key {
    /// A digit or the decimal point.
    Digit(char),
    Operator(Operator),
    SquareRoot,
    Equals,
    Backspace,
    Clear,
}

/// A character that is not a keypad key.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("unsupported key '{key}' at position {position}")]
    Unsupported { key: char, position: usize },
}

impl Key {
    /// Map a typed character to a key.
    ///
    /// Returns `None` for whitespace and for characters with no key.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' | '.' => Some(Self::Digit(c)),
            '=' | '\n' | '\r' => Some(Self::Equals),
            'c' | 'C' | '\u{1b}' => Some(Self::Clear),
            '<' | '\u{8}' | '\u{7f}' => Some(Self::Backspace),
            'r' | '\u{221a}' => Some(Self::SquareRoot),
            _ => Operator::from_symbol(c).map(Self::Operator),
        }
    }
}

/// Parse a string of typed characters into keys.
///
/// Spaces and tabs are skipped; any other unknown character is an error.
pub fn parse_keys(input: &str) -> Result<Vec<Key>, KeyError> {
    let mut keys = Vec::with_capacity(input.len());
    for (position, c) in input.chars().enumerate() {
        if c == ' ' || c == '\t' {
            continue;
        }
        let key = Key::from_char(c).ok_or(KeyError::Unsupported { key: c, position })?;
        keys.push(key);
    }
    Ok(keys)
}
