//! The remote compute service and its history.
//!
//! The calculator never does arithmetic itself. Every operation is sent to a
//! [`ComputeClient`], which also owns the calculation history. Two backends
//! exist:
//! - [`HttpComputeClient`]: the JSON service (`/calculate`, `/history`)
//! - [`LocalCompute`]: an in-process service with the same semantics

mod http;
mod local;

pub use http::HttpComputeClient;
pub use local::{HISTORY_LIMIT, LocalCompute};

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Operation names understood by the compute service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Sqrt,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
        Self::Power,
        Self::Sqrt,
    ];

    /// Wire name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Modulo => "modulo",
            Self::Power => "power",
            Self::Sqrt => "sqrt",
        }
    }

    /// Whether the operation takes a single operand.
    pub fn is_unary(self) -> bool {
        matches!(self, Self::Sqrt)
    }

    /// Symbol used when rendering history entries.
    pub fn history_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "\u{2212}",
            Self::Multiply => "\u{d7}",
            Self::Divide => "\u{f7}",
            Self::Modulo => "mod",
            Self::Power => "^",
            Self::Sqrt => "\u{221a}",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.name() == normalised)
            .ok_or_else(|| ServiceError::Rejected(format!("Invalid operation: {}", s.trim())))
    }
}

/// A calculation recorded by the service.
///
/// The operation is kept as the raw name the service reported; entries are
/// only ever rendered, never validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub operation: String,
    pub num1: f64,
    #[serde(default)]
    pub num2: Option<f64>,
    pub result: f64,
    pub timestamp: String,
}

impl HistoryEntry {
    /// The operation, if the service reported a known name.
    pub fn known_operation(&self) -> Option<Operation> {
        self.operation.parse().ok()
    }
}

/// Error returned by a compute call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The service refused the inputs; the message comes from the service.
    #[error("{0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Protocol(String),
}

/// Error returned by history calls. Never fatal to the session.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    #[error("Failed to load history: {0}")]
    Load(String),

    #[error("Failed to clear history: {0}")]
    Clear(String),
}

/// Client for the compute service.
///
/// Calls are request/response; the calculator issues them strictly one at a
/// time.
#[async_trait]
pub trait ComputeClient: Send + Sync {
    /// Apply `operation` to the operands and return the result.
    ///
    /// `num2` is `None` for unary operations.
    async fn compute(
        &self,
        operation: Operation,
        num1: f64,
        num2: Option<f64>,
    ) -> Result<f64, ServiceError>;

    /// Recorded calculations, most recent first.
    async fn list_history(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Remove all recorded calculations.
    async fn clear_history(&self) -> Result<(), HistoryError>;

    /// Human-readable backend name.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
        }
        assert_eq!(" Modulo ".parse::<Operation>(), Ok(Operation::Modulo));
    }

    #[test]
    fn test_unknown_operation() {
        let err = "log".parse::<Operation>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation: log");
    }

    #[test]
    fn test_operation_serialises_lowercase() {
        let json = serde_json::to_string(&Operation::Modulo).unwrap();
        assert_eq!(json, "\"modulo\"");
    }

    #[test]
    fn test_history_entry_without_num2() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"operation":"sqrt","num1":16.0,"result":4.0,"timestamp":"2024-05-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(entry.num2, None);
        assert_eq!(entry.known_operation(), Some(Operation::Sqrt));
    }

    #[test]
    fn test_history_entry_unknown_operation_kept() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"operation":"cbrt","num1":8.0,"num2":null,"result":2.0,"timestamp":"x"}"#,
        )
        .unwrap();
        assert_eq!(entry.operation, "cbrt");
        assert_eq!(entry.known_operation(), None);
    }

    #[test]
    fn test_rejected_shows_service_message() {
        let err = ServiceError::Rejected("Division by zero is not allowed".to_string());
        assert_eq!(err.to_string(), "Division by zero is not allowed");
    }
}
