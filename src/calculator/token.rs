//! Token types produced by the tokenizer.

use std::ops::Range;

use crate::compute::Operation;

/// A binary operator as it appears on the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    /// All operators, in keypad order.
    pub const ALL: [Operator; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Power,
    ];

    /// The symbol written into the display expression.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '\u{2212}',
            Self::Multiply => '\u{d7}',
            Self::Divide => '\u{f7}',
            Self::Power => '^',
        }
    }

    /// Recognise a display symbol or its ASCII keyboard spelling.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '\u{2212}' | '-' => Some(Self::Subtract),
            '\u{d7}' | '*' => Some(Self::Multiply),
            '\u{f7}' | '/' => Some(Self::Divide),
            '^' => Some(Self::Power),
            _ => None,
        }
    }

    /// The operation name sent to the compute service.
    pub fn operation(self) -> Operation {
        match self {
            Self::Add => Operation::Add,
            Self::Subtract => Operation::Subtract,
            Self::Multiply => Operation::Multiply,
            Self::Divide => Operation::Divide,
            Self::Power => Operation::Power,
        }
    }
}

/// Check whether a character is one of the operator symbols.
pub fn is_operator_symbol(c: char) -> bool {
    Operator::from_symbol(c).is_some()
}

/// Check whether a character can start a negative literal.
pub(crate) fn is_minus_sign(c: char) -> bool {
    c == '-' || c == '\u{2212}'
}

/// A single lexical unit of a display expression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
}

/// A token together with the byte range of the expression it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenInfo {
    pub token: Token,
    pub span: Range<usize>,
}
