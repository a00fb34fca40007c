use chrono::{DateTime, NaiveDate, Utc};

/// Render a money amount the way tables and the composer show it: `$350.00`.
pub fn format_money(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${amount:.2}")
    }
}

/// `2025-05-10 10:30` in UTC.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// `2025-05-10`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(format_money(350.0), "$350.00");
        assert_eq!(format_money(99.999), "$100.00");
        assert_eq!(format_money(0.5), "$0.50");
    }

    #[test]
    fn non_finite_money_is_zero() {
        assert_eq!(format_money(f64::NAN), "$0.00");
    }

    #[test]
    fn timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2025, 5, 10, 10, 30, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-05-10 10:30");
    }
}
