//! In-process compute service.
//!
//! Mirrors the JSON service: same operations, same rejection messages and a
//! bounded, most-recent-first history. Used for `--local` and in tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::debug;

use super::{ComputeClient, HistoryEntry, HistoryError, Operation, ServiceError};

/// Number of calculations the service remembers.
pub const HISTORY_LIMIT: usize = 25;

/// Compute service running inside the calculator process.
pub struct LocalCompute {
    history: Mutex<VecDeque<HistoryEntry>>,
    limit: usize,
}

impl Default for LocalCompute {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalCompute {
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    /// Create a service that keeps at most `limit` history entries.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(limit)),
            limit,
        }
    }

    fn record(&self, operation: Operation, num1: f64, num2: Option<f64>, result: f64) {
        let timestamp = Utc::now()
            .naive_utc()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();

        let mut history = self.history.lock();
        history.push_front(HistoryEntry {
            operation: operation.name().to_string(),
            num1,
            num2,
            result,
            timestamp,
        });
        history.truncate(self.limit);
    }
}

/// Apply an operation with the service's validation rules.
pub(crate) fn apply(operation: Operation, num1: f64, num2: Option<f64>) -> Result<f64, ServiceError> {
    let rhs = || {
        num2.ok_or_else(|| {
            ServiceError::Rejected(format!("num2 is required for {} operation", operation))
        })
    };

    let result = match operation {
        Operation::Add => num1 + rhs()?,
        Operation::Subtract => num1 - rhs()?,
        Operation::Multiply => num1 * rhs()?,
        Operation::Divide => {
            let divisor = rhs()?;
            if divisor == 0.0 {
                return Err(ServiceError::Rejected(
                    "Division by zero is not allowed".to_string(),
                ));
            }
            num1 / divisor
        }
        Operation::Modulo => {
            let divisor = rhs()?;
            if divisor == 0.0 {
                return Err(ServiceError::Rejected(
                    "Modulo by zero is not allowed".to_string(),
                ));
            }
            floored_rem(num1, divisor)
        }
        Operation::Power => num1.powf(rhs()?),
        Operation::Sqrt => {
            if num1 < 0.0 {
                return Err(ServiceError::Rejected(
                    "Cannot calculate square root of negative number".to_string(),
                ));
            }
            num1.sqrt()
        }
    };

    if !result.is_finite() {
        return Err(ServiceError::Rejected(
            "Result is not a finite number".to_string(),
        ));
    }
    Ok(result)
}

/// Remainder whose sign follows the divisor.
fn floored_rem(num1: f64, divisor: f64) -> f64 {
    let rem = num1 % divisor;
    if rem != 0.0 && (rem < 0.0) != (divisor < 0.0) {
        rem + divisor
    } else {
        rem
    }
}

#[async_trait]
impl ComputeClient for LocalCompute {
    async fn compute(
        &self,
        operation: Operation,
        num1: f64,
        num2: Option<f64>,
    ) -> Result<f64, ServiceError> {
        debug!(%operation, num1, ?num2, "computing locally");
        let result = apply(operation, num1, num2)?;
        self.record(operation, num1, num2, result);
        Ok(result)
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.history.lock().iter().cloned().collect())
    }

    async fn clear_history(&self) -> Result<(), HistoryError> {
        self.history.lock().clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
