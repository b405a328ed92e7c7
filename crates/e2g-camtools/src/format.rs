//! Number formatting for generated G-code.

/// Format a coordinate or height.
///
/// Without a precision the shortest decimal that round-trips is written
/// (`0.01`, `-0.0725`, `10000`), never in exponent notation. With a
/// precision the value is rounded to that many decimals. Negative zero is
/// written as `0`.
pub fn format_number(value: f64, precision: Option<usize>) -> String {
    let text = match precision {
        Some(decimals) => format!("{:.*}", decimals, value),
        None => format!("{}", value),
    };

    let negative_zero = text
        .strip_prefix('-')
        .is_some_and(|magnitude| magnitude.chars().all(|ch| ch == '0' || ch == '.'));
    if negative_zero {
        text[1..].to_string()
    } else {
        text
    }
}

/// Format a feed rate word value.
///
/// Whole feed rates keep a trailing decimal point (`10.`) so controllers
/// that treat bare integers as thousandths read them correctly.
pub fn format_feed_rate(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}.", value)
    } else {
        format!("{}", value)
    }
}
