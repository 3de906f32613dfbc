/// Round `value` to `places` decimal places, halves away from zero.
///
/// # Examples
///
/// ```
/// use meetingflow_core::formatting::round_to;
///
/// assert_eq!(round_to(2.345, 1), 2.3);
/// assert_eq!(round_to(-1.25, 1), -1.3);
/// ```
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Round a currency or ratio value to cents.
///
/// # Examples
///
/// ```
/// use meetingflow_core::formatting::round2;
///
/// assert_eq!(round2(150.499), 150.5);
/// assert_eq!(round2(35.0), 35.0);
/// ```
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Divide `total` by `count`, rounded to cents; `0.0` when `count` is not
/// positive.
pub fn safe_average(total: f64, count: f64) -> f64 {
    if count <= 0.0 {
        return 0.0;
    }
    round2(total / count)
}

/// Shortest display of a value rounded to cents: `140`, `150.5`, `0.25`.
///
/// This is the form used inside insight sentences.
///
/// # Examples
///
/// ```
/// use meetingflow_core::formatting::format_amount;
///
/// assert_eq!(format_amount(140.0), "140");
/// assert_eq!(format_amount(150.5), "150.5");
/// assert_eq!(format_amount(1.0 / 3.0), "0.33");
/// ```
pub fn format_amount(value: f64) -> String {
    format!("{}", round2(value))
}

/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use meetingflow_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(-9876.5, 2), "-9,876.50");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let fixed = format!("{:.prec$}", round_to(value.abs(), decimals), prec = decimals as usize);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a USD amount with two decimals and thousands separators.
///
/// # Examples
///
/// ```
/// use meetingflow_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.5), "$1,234.50");
/// assert_eq!(format_currency(0.0), "$0.00");
/// ```
pub fn format_currency(amount: f64) -> String {
    format!("${}", format_number(amount, 2))
}

/// Format fractional hours as `"1h 30m"`, `"45m"` or `"2h"`.
pub fn format_hours(hours: f64) -> String {
    let total_mins = (hours * 60.0).round() as i64;
    match (total_mins / 60, total_mins % 60) {
        (0, mins) => format!("{}m", mins),
        (h, 0) => format!("{}h", h),
        (h, mins) => format!("{}h {}m", h, mins),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

// ── Tests ──────────────────────────────────────────────────────────────────────
