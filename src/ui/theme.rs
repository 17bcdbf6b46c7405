//! Terminal colors.

use colored::Color;

/// Colors used by the terminal front-end.
#[derive(Clone, Copy, Debug)]
pub struct CalcTheme {
    pub display: Color,
    pub result: Color,
    pub muted: Color,
    pub index: Color,
    pub success: Color,
    pub error: Color,
}

static THEME: CalcTheme = CalcTheme {
    display: Color::BrightWhite,
    result: Color::BrightCyan,
    muted: Color::BrightBlack,
    index: Color::Blue,
    success: Color::Green,
    error: Color::Red,
};

pub fn theme() -> &'static CalcTheme {
    &THEME
}
