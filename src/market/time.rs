use chrono::{DateTime, Utc};

fn to_utc(unix_secs: i64) -> Option<DateTime<Utc>> {
    if unix_secs == 0 {
        return None;
    }
    DateTime::<Utc>::from_timestamp(unix_secs, 0)
}

/// `YYYY-MM-DD HH:MM:SS` in UTC; empty for 0 or out-of-range input.
pub fn format_date_time(unix_secs: i64) -> String {
    to_utc(unix_secs)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// `DD/MM/YY` in UTC; empty for 0 or out-of-range input.
pub fn format_short_date(unix_secs: i64) -> String {
    to_utc(unix_secs)
        .map(|dt| dt.format("%d/%m/%y").to_string())
        .unwrap_or_default()
}
