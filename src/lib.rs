//! calcdeck: a keypad calculator whose arithmetic is done by a compute
//! service.
//!
//! Expressions are typed key by key, evaluated strictly left to right and
//! sent to the service one operation at a time.

pub mod calculator;
pub mod cli;
pub mod compute;
pub mod config;
pub mod items;
pub mod keys;
pub mod repl;
pub mod session;
pub mod ui;

pub use calculator::{CalcError, format_number, tokenize};
pub use compute::{ComputeClient, HttpComputeClient, LocalCompute, Operation};
pub use session::{Calculator, Session};
