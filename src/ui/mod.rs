//! Terminal rendering for the calculator.

mod display;
mod history;
mod theme;

pub use display::{Status, render_display, render_result, render_status};
pub use history::{render_history, render_history_item};
pub use theme::{CalcTheme, theme};
