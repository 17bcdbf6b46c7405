//! Number formatting for the display and the history list.

/// Fractional digits kept when rounding away binary noise.
const DISPLAY_PRECISION: i32 = 10;

/// Magnitude from which thousands separators are shown.
const GROUPING_THRESHOLD: f64 = 1000.0;

/// Above 2^53 a scaled value has no fractional part left to round.
const MAX_EXACT_SCALED: f64 = 9_007_199_254_740_992.0;

/// Format a number for display.
///
/// The value is rounded to ten decimal places first so that `0.1 + 0.2`
/// shows as `0.3`. Values of magnitude 1000 and above get thousands
/// separators. NaN formats as `0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "0".to_string();
    }
    if value.is_infinite() {
        let text = if value.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        return text.to_string();
    }

    // Adding 0.0 turns -0.0 into 0.0
    let rounded = round_to_precision(value) + 0.0;
    let plain = rounded.to_string();

    if rounded.abs() < GROUPING_THRESHOLD {
        return plain;
    }

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (plain.as_str(), ""),
    };
    let (negative, digits) = match int_part.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, int_part),
    };

    let mut formatted = String::new();
    if negative {
        formatted.push('-');
    }
    formatted.push_str(&format_with_separators(digits));

    let frac = trim_fraction(frac_part);
    if !frac.is_empty() {
        formatted.push('.');
        formatted.push_str(frac);
    }
    formatted
}

fn round_to_precision(value: f64) -> f64 {
    let scale = 10f64.powi(DISPLAY_PRECISION);
    let scaled = value * scale;
    if scaled.abs() >= MAX_EXACT_SCALED {
        return value;
    }
    // Halves round toward positive infinity
    let floor = scaled.floor();
    let rounded = if scaled - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded / scale
}

/// Keep at most ten fractional digits, without trailing zeros.
fn trim_fraction(frac: &str) -> &str {
    let max = DISPLAY_PRECISION as usize;
    let frac = if frac.len() > max { &frac[..max] } else { frac };
    frac.trim_end_matches('0')
}

/// Insert a comma every three digits, counting from the right.
fn format_with_separators(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
