//! Items shown next to the calculator display.

mod history;

pub use history::{EMPTY_HISTORY, FAILED_HISTORY, HistoryItem, HistoryPanel};
