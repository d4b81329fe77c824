//! Money helpers. Amounts are stored as integer minor units (cents).

/// Formats an amount in cents as a decimal string, e.g. `12345` -> `"123.45"`.
pub fn format_cents(amount_cents: i64) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let abs = amount_cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Percentage of `goal` reached by `raised`, clamped to 0..=100.
pub fn progress_percent(raised_cents: i64, goal_cents: i64) -> u8 {
    if goal_cents <= 0 || raised_cents <= 0 {
        return 0;
    }
    let pct = (raised_cents as i128 * 100) / goal_cents as i128;
    pct.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(12345), "123.45");
        assert_eq!(format_cents(-250), "-2.50");
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 10_000), 0);
        assert_eq!(progress_percent(2_500, 10_000), 25);
        assert_eq!(progress_percent(20_000, 10_000), 100);
        assert_eq!(progress_percent(500, 0), 0);
    }
}
