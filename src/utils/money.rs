/// Formats cents as US dollars, e.g. `1234567` -> `$12,345.67`.
pub fn format_usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{:02}", abs % 100)
}

/// Integer average rounded half away from zero; 0 when `count` is 0.
pub fn average_cents(total_cents: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    (total_cents as f64 / count as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0), "$0.00");
        assert_eq!(format_usd(5), "$0.05");
        assert_eq!(format_usd(1550), "$15.50");
        assert_eq!(format_usd(123_456_789), "$1,234,567.89");
        assert_eq!(format_usd(-250), "-$2.50");
    }

    #[test]
    fn test_average_cents() {
        assert_eq!(average_cents(3500, 2), 1750);
        assert_eq!(average_cents(1000, 3), 333);
        assert_eq!(average_cents(2000, 3), 667);
        assert_eq!(average_cents(1000, 0), 0);
    }
}
