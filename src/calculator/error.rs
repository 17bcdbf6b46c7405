//! Errors raised while editing or evaluating an expression.

use crate::compute::ServiceError;

/// Why an evaluation (or an edit) did not go through.
///
/// None of these are fatal: the session always returns to an editable
/// expression.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Nothing to evaluate. Silently ignored by the front-end.
    #[error("nothing to evaluate")]
    EmptyExpression,

    /// The expression ends with an operator; it is left intact for editing.
    #[error("expression ends with an operator")]
    TrailingOperator,

    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// The compute service failed; the chain was aborted.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Input arrived while an evaluation was still running.
    #[error("an evaluation is already in progress")]
    Busy,
}

impl CalcError {
    /// Whether the error should be shown to the user.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::EmptyExpression)
    }
}
