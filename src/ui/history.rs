//! History panel rendering.
//!
//! Each item takes two lines: the indexed expression with its timestamp,
//! then the result with a `= ` prefix.

use colored::Colorize;

use super::display::render_result;
use super::theme::theme;
use crate::items::{HistoryItem, HistoryPanel};

/// Render the history panel, or its placeholder.
pub fn render_history(panel: &HistoryPanel) -> String {
    if let Some(placeholder) = panel.placeholder() {
        return placeholder.color(theme().muted).italic().to_string();
    }

    panel
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| render_history_item(index, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single history item.
///
/// The index is what `:use` takes to recall the item.
pub fn render_history_item(index: usize, item: &HistoryItem) -> String {
    let t = theme();
    format!(
        "{} {}  {}\n    {}",
        format!("[{index}]").color(t.index),
        item.expression,
        item.timestamp.color(t.muted),
        render_result(&item.display_result),
    )
}
