//! Display helpers for prices, volumes and percentages

/// Formats a USD amount: 2 decimals from $1 up, 6 below
///
/// With `show_sign`, non-zero values get an explicit `+` or `-`.
pub fn format_currency(value: f64, show_sign: bool) -> String {
    let decimals = if value.abs() >= 1.0 { 2 } else { 6 };
    let body = format!("${}", group_thousands(&format!("{:.*}", decimals, value.abs())));

    if value < 0.0 {
        format!("-{}", body)
    } else if show_sign && value > 0.0 {
        format!("+{}", body)
    } else {
        body
    }
}

/// Formats large amounts with a T/B/M/K suffix
pub fn format_compact(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

    for (scale, suffix) in UNITS {
        if value >= scale {
            return format!("${:.2}{}", value / scale, suffix);
        }
    }
    format!("${}", format_grouped(value))
}

/// Formats a percentage with an explicit sign
pub fn format_percentage(value: f64) -> String {
    let sign = if value >= 0.0 { '+' } else { '-' };
    format!("{}{:.2}%", sign, value.abs())
}

/// Formats the rounded integer part with thousands separators
pub fn format_grouped(value: f64) -> String {
    let grouped = group_thousands(&format!("{:.0}", value.abs()));
    if value <= -0.5 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_thousands(number: &str) -> String {
    let (integer, fraction) = match number.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (number, None),
    };

    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(67234.56, false), "$67,234.56");
        assert_eq!(format_currency(0.08, false), "$0.080000");
        assert_eq!(format_currency(1245.67, true), "+$1,245.67");
        assert_eq!(format_currency(-3.5, true), "-$3.50");
        assert_eq!(format_currency(0.0, true), "$0.000000");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(1_329_456_789_012.0), "$1.33T");
        assert_eq!(format_compact(28_456_789_012.0), "$28.46B");
        assert_eq!(format_compact(7_890_000.0), "$7.89M");
        assert_eq!(format_compact(1_000.0), "$1.00K");
        assert_eq!(format_compact(999.4), "$999");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(1.234), "+1.23%");
        assert_eq!(format_percentage(-4.567), "-4.57%");
        assert_eq!(format_percentage(0.0), "+0.00%");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(19_789_456.78), "19,789,457");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(-1_234.0), "-1,234");
    }
}
