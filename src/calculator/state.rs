//! Display state and its edit transitions.
//!
//! Every edit is a pure `(EditState, Edit) -> EditState` function, so the
//! behaviour of the keypad can be tested without any rendering or service.

use super::format::format_number;
use super::token::{Operator, is_operator_symbol};

/// A user edit of the display expression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edit {
    /// A digit or the decimal point.
    Digit(char),
    /// A binary operator.
    Operator(Operator),
    Backspace,
    Clear,
}

/// What the user has typed versus what has been computed.
///
/// `last_result` is set only while `expression` still shows that result
/// unedited; any edit that changes the expression drops it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditState {
    expression: String,
    last_result: Option<f64>,
}

impl EditState {
    /// Show a computed value, ready to be reused or replaced.
    pub fn with_result(value: f64) -> Self {
        Self {
            expression: format_number(value),
            last_result: Some(value),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn last_result(&self) -> Option<f64> {
        self.last_result
    }

    /// Whether the display still shows an unedited result.
    pub fn is_post_result(&self) -> bool {
        self.last_result
            .is_some_and(|value| self.expression == format_number(value))
    }

    /// The operator the expression currently ends with, if any.
    pub fn trailing_operator(&self) -> Option<Operator> {
        self.expression.chars().last().and_then(Operator::from_symbol)
    }

    /// Apply an edit and return the new state.
    #[must_use]
    pub fn apply(self, edit: Edit) -> Self {
        match edit {
            Edit::Digit(c) => self.push_digit(c),
            Edit::Operator(op) => self.push_operator(op),
            Edit::Backspace => self.backspace(),
            Edit::Clear => Self::default(),
        }
    }

    fn push_digit(self, c: char) -> Self {
        let mut expression = if self.is_post_result() {
            String::new()
        } else {
            self.expression
        };
        expression.push(c);

        Self {
            expression,
            last_result: None,
        }
    }

    fn push_operator(self, op: Operator) -> Self {
        if self.expression.is_empty() {
            return self;
        }

        let mut expression = self.expression;
        // The sign of a result like `-7` counts as a trailing operator too
        if expression.chars().last().is_some_and(is_operator_symbol) {
            expression.pop();
        }
        expression.push(op.symbol());

        Self {
            expression,
            last_result: None,
        }
    }

    fn backspace(mut self) -> Self {
        if self.expression.pop().is_some() && !self.is_post_result() {
            self.last_result = None;
        }
        self
    }
}
