//! Tokenizer for display expressions.
//!
//! Splits a flat string such as `12+5×3` into numbers and operators. A minus
//! sign at the start of the expression or right after an operator belongs to
//! the number that follows it. The tokenizer never fails: characters it does
//! not understand are dropped and validation is left to the evaluator.

use super::token::{Operator, Token, TokenInfo, is_minus_sign, is_operator_symbol};

/// Tokenize an expression into plain tokens.
pub fn tokenize(expr: &str) -> Vec<Token> {
    tokenize_spanned(expr)
        .into_iter()
        .map(|info| info.token)
        .collect()
}

/// Tokenize an expression, keeping the byte span of every token.
pub fn tokenize_spanned(expr: &str) -> Vec<TokenInfo> {
    let mut tokenizer = Tokenizer::default();
    for (pos, c) in expr.char_indices() {
        tokenizer.feed(pos, c);
    }
    tokenizer.finish()
}

#[derive(Default)]
struct Tokenizer {
    tokens: Vec<TokenInfo>,
    literal: String,
    literal_start: usize,
    literal_end: usize,
    /// Last character that was a digit, dot or operator.
    prev: Option<char>,
}

impl Tokenizer {
    fn feed(&mut self, pos: usize, c: char) {
        let end = pos + c.len_utf8();

        if c.is_ascii_digit() || c == '.' {
            self.push_literal(pos, end, c);
        } else if c == ',' {
            // Thousands separators from formatted results
            if !self.literal.is_empty() {
                self.literal_end = end;
            }
            return;
        } else if c.is_whitespace() {
            self.flush();
            return;
        } else if is_minus_sign(c) && self.starts_negative_literal() {
            self.push_literal(pos, end, '-');
        } else if let Some(op) = Operator::from_symbol(c) {
            self.flush();
            self.tokens.push(TokenInfo {
                token: Token::Operator(op),
                span: pos..end,
            });
        } else {
            return;
        }

        self.prev = Some(c);
    }

    fn starts_negative_literal(&self) -> bool {
        self.literal.is_empty() && self.prev.is_none_or(is_operator_symbol)
    }

    fn push_literal(&mut self, start: usize, end: usize, c: char) {
        if self.literal.is_empty() {
            self.literal_start = start;
        }
        self.literal.push(c);
        self.literal_end = end;
    }

    fn flush(&mut self) {
        if self.literal.is_empty() {
            return;
        }
        let value = parse_literal(&self.literal);
        self.tokens.push(TokenInfo {
            token: Token::Number(value),
            span: self.literal_start..self.literal_end,
        });
        self.literal.clear();
    }

    fn finish(mut self) -> Vec<TokenInfo> {
        self.flush();
        self.tokens
    }
}

/// Parse the longest numeric prefix of a literal.
///
/// `1.2.3` reads as `1.2`; a literal without any digit (`-`, `.`) is NaN.
pub(crate) fn parse_literal(literal: &str) -> f64 {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (i, c) in literal.char_indices() {
        match c {
            '-' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            '0'..='9' => seen_digit = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return f64::NAN;
    }
    literal[..end].parse().unwrap_or(f64::NAN)
}
