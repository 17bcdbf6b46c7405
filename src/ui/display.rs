//! Display line and status messages.

use colored::Colorize;

use super::theme::theme;

/// Placeholder shown for an empty display.
const EMPTY_DISPLAY: &str = "0";

/// Outcome of a user action, shown below the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status<'a> {
    Success(&'a str),
    Error(&'a str),
}

/// Render the calculator display.
///
/// An empty expression shows as `0`, like a physical calculator.
pub fn render_display(expression: &str) -> String {
    let t = theme();
    let text = if expression.is_empty() {
        EMPTY_DISPLAY
    } else {
        expression
    };
    text.color(t.display).bold().to_string()
}

/// Render a result line: `= <result>`.
pub fn render_result(result: &str) -> String {
    format!("= {result}").color(theme().result).to_string()
}

/// Render a status line.
pub fn render_status(status: Status<'_>) -> String {
    let t = theme();
    match status {
        Status::Success(message) => format!("\u{2713} {message}").color(t.success).to_string(),
        Status::Error(message) => format!("\u{2717} {message}").color(t.error).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_empty_display_shows_zero() {
        plain();
        assert_eq!(render_display(""), "0");
        assert_eq!(render_display("12+5"), "12+5");
    }

    #[test]
    fn test_result_line() {
        plain();
        assert_eq!(render_result("1,234"), "= 1,234");
    }

    #[test]
    fn test_status_lines() {
        plain();
        assert_eq!(render_status(Status::Success("History cleared")), "✓ History cleared");
        assert_eq!(
            render_status(Status::Error("Division by zero is not allowed")),
            "✗ Division by zero is not allowed"
        );
    }
}
