//! History items representing past calculations.

use chrono::{DateTime, NaiveDateTime};

use crate::calculator::format_number;
use crate::compute::{HistoryEntry, HistoryError};

/// Placeholder shown when the service has no calculations.
pub const EMPTY_HISTORY: &str = "No calculations yet";

/// Placeholder shown when the history could not be fetched.
pub const FAILED_HISTORY: &str = "Failed to load history";

/// A calculation from the service's history, ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryItem {
    /// The calculation, e.g. `2 + 3` or `√16`.
    pub expression: String,
    /// The result formatted for display (with thousand separators).
    pub display_result: String,
    /// When the service performed the calculation.
    pub timestamp: String,
    /// The raw result, used when the item is recalled.
    pub value: f64,
}

impl HistoryItem {
    /// Create a history item from a service entry.
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            expression: format_history_expression(entry),
            display_result: format_number(entry.result),
            timestamp: format_timestamp(&entry.timestamp),
            value: entry.result,
        }
    }
}

/// Render the operation of an entry with display symbols.
fn format_history_expression(entry: &HistoryEntry) -> String {
    let operation = entry.known_operation();
    if let Some(op) = operation.filter(|op| op.is_unary()) {
        return format!("{}{}", op.history_symbol(), format_number(entry.num1));
    }

    let symbol = operation.map_or(entry.operation.as_str(), |op| op.history_symbol());
    let rhs = entry.num2.map(format_number).unwrap_or_default();
    format!("{} {} {}", format_number(entry.num1), symbol, rhs)
}

/// Show the service's timestamp as `YYYY-MM-DD HH:MM:SS` when it parses.
fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(DISPLAY).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY).to_string();
    }
    raw.to_string()
}

/// The history list as the front-end shows it.
///
/// Load failures never reach the calculator: they degrade to a placeholder.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum HistoryPanel {
    /// History has not been requested yet.
    #[default]
    NotLoaded,
    Entries(Vec<HistoryItem>),
    Failed(String),
}

impl HistoryPanel {
    /// Build the panel from the outcome of a history request.
    pub fn from_result(result: Result<Vec<HistoryEntry>, HistoryError>) -> Self {
        match result {
            Ok(entries) => Self::Entries(
                entries.iter().map(HistoryItem::from_entry).collect(),
            ),
            Err(err) => Self::Failed(err.to_string()),
        }
    }

    /// The items to list; empty unless history loaded.
    pub fn items(&self) -> &[HistoryItem] {
        match self {
            Self::Entries(items) => items,
            Self::NotLoaded | Self::Failed(_) => &[],
        }
    }

    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.items().get(index)
    }

    /// Text to show instead of a list, if any.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Entries(items) if items.is_empty() => Some(EMPTY_HISTORY),
            Self::Entries(_) | Self::NotLoaded => None,
            Self::Failed(_) => Some(FAILED_HISTORY),
        }
    }
}
