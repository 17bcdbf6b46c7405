//! Left-to-right evaluation of display expressions.
//!
//! There is no operator precedence: `2+3×4` is `(2+3)×4`. Every operator
//! becomes one call to the compute service, and each call's result is the
//! left operand of the next one.

use tracing::debug;

use super::error::CalcError;
use super::token::{Operator, Token, is_operator_symbol};
use super::tokenizer::{tokenize, tokenize_spanned};
use crate::compute::{ComputeClient, Operation};

/// What evaluating an expression will take.
#[derive(Clone, Debug, PartialEq)]
pub enum Plan {
    /// A lone number: no service call, the value is just reformatted.
    Bare(f64),
    /// One or more operator steps.
    Chain(Chain),
}

/// A single `operator operand` pair applied to the running result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub operator: Operator,
    pub operand: f64,
}

/// A seed value followed by the steps to fold into it.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    seed: f64,
    steps: Vec<Step>,
}

/// Validate an expression and work out how to evaluate it.
///
/// Returns `Ok(None)` when the expression holds no tokens at all.
pub fn plan_evaluation(expression: &str) -> Result<Option<Plan>, CalcError> {
    if expression.is_empty() || expression == "0" {
        return Err(CalcError::EmptyExpression);
    }
    if expression.chars().last().is_some_and(is_operator_symbol) {
        return Err(CalcError::TrailingOperator);
    }

    let tokens = tokenize(expression);
    match tokens.as_slice() {
        [] => Ok(None),
        [Token::Number(value)] => Ok(Some(Plan::Bare(*value))),
        _ => Chain::from_tokens(&tokens).map(|chain| Some(Plan::Chain(chain))),
    }
}

impl Chain {
    fn from_tokens(tokens: &[Token]) -> Result<Self, CalcError> {
        let (first, rest) = tokens
            .split_first()
            .ok_or_else(|| CalcError::MalformedExpression("no tokens".to_string()))?;
        let seed = match first {
            Token::Number(value) => operand(*value)?,
            Token::Operator(op) => {
                return Err(CalcError::MalformedExpression(format!(
                    "expected a number before '{}'",
                    op.symbol()
                )));
            }
        };

        let mut steps = Vec::with_capacity(rest.len() / 2);
        for pair in rest.chunks(2) {
            match pair {
                [Token::Operator(operator), Token::Number(value), ..] => steps.push(Step {
                    operator: *operator,
                    operand: operand(*value)?,
                }),
                // A dangling operator ends the chain
                [Token::Operator(_)] | [] => break,
                [Token::Number(_), ..] => {
                    return Err(CalcError::MalformedExpression(
                        "expected an operator between numbers".to_string(),
                    ));
                }
                [Token::Operator(_), Token::Operator(op), ..] => {
                    return Err(CalcError::MalformedExpression(format!(
                        "unexpected '{}'",
                        op.symbol()
                    )));
                }
            }
        }

        Ok(Self { seed, steps })
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Fold the steps through the compute service, one call at a time.
    ///
    /// The first failing call aborts the chain; results folded before it are
    /// discarded, not applied to the display.
    pub async fn run(&self, client: &dyn ComputeClient) -> Result<f64, CalcError> {
        let mut result = self.seed;
        for (index, step) in self.steps.iter().enumerate() {
            let operation = step.operator.operation();
            debug!(index, %operation, lhs = result, rhs = step.operand, "chain step");
            result = client
                .compute(operation, result, Some(step.operand))
                .await?;
        }
        Ok(result)
    }
}

fn operand(value: f64) -> Result<f64, CalcError> {
    if value.is_nan() {
        return Err(CalcError::MalformedExpression(
            "invalid number".to_string(),
        ));
    }
    Ok(value)
}

/// The number currently being typed: the trailing number of the expression.
///
/// Returns `Ok(None)` when the expression is empty or ends with an operator.
pub fn current_operand(expression: &str) -> Result<Option<f64>, CalcError> {
    let tokens = tokenize_spanned(expression);
    let Some(last) = tokens.last() else {
        return Ok(None);
    };
    let Token::Number(value) = last.token else {
        return Ok(None);
    };

    debug!(operand = &expression[last.span.clone()], "current operand");
    operand(value).map(Some)
}

/// Take the square root of `value` through the compute service.
pub async fn square_root(client: &dyn ComputeClient, value: f64) -> Result<f64, CalcError> {
    Ok(client.compute(Operation::Sqrt, value, None).await?)
}
