//! Calculator core: keypad expressions and their evaluation.
//!
//! This module provides functionality to:
//! - Tokenize a display expression such as `12+5×3`
//! - Track the display state through pure edit transitions
//! - Evaluate expressions strictly left to right through a compute service
//! - Format numbers for display

mod error;
mod evaluation;
mod format;
mod state;
mod token;
mod tokenizer;

pub use error::CalcError;
pub use evaluation::{Chain, Plan, Step, current_operand, plan_evaluation, square_root};
pub use format::format_number;
pub use state::{Edit, EditState};
pub use token::{Operator, Token, TokenInfo, is_operator_symbol};
pub use tokenizer::{tokenize, tokenize_spanned};
