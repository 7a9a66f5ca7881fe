// ---------------------------------------------------------------------------
// Brazilian-style number text: "1.234,56"
// ---------------------------------------------------------------------------

/// Interpret a cell as a number.
///
/// When the text has a comma it is taken as the decimal separator and any
/// periods are thousands separators (`"1.234,56"` → `1234.56`). Otherwise the
/// text is parsed as-is (`"12.5"` → `12.5`). Empty, non-numeric and
/// non-finite values yield `None`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let normalized = if text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else {
        text.to_string()
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format with two decimals, `.` as thousands separator and `,` as decimal
/// separator: `1322.56` → `"1.322,56"`.
pub fn format_brl(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, &d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(d as char);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}
