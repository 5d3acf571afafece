// src/format.rs
//! Display formatting: relative timestamps and percentages.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};

/// Parse a backend timestamp. Accepts RFC 3339 (`...Z` / `...+00:00`) and
/// naive ISO strings, which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|n| Utc.from_utc_datetime(&n))
}

/// `Just now` / `N minute(s) ago` / `N hour(s) ago`, else the full
/// date-time in `tz`.
pub fn relative_time_in<Tz>(then: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mins = (now - then).num_milliseconds().div_euclid(60_000);
    if mins < 1 {
        return "Just now".to_string();
    }
    if mins < 60 {
        return format!("{mins} minute{} ago", plural(mins));
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours} hour{} ago", plural(hours));
    }
    full_date_time(then, tz)
}

pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    relative_time_in(then, now, &Local)
}

/// Relative time for an optional raw timestamp: `missing` when absent, the
/// raw text when unparsable.
pub fn relative_label(raw: Option<&str>, now: DateTime<Utc>, missing: &str) -> String {
    match raw {
        None => missing.to_string(),
        Some(s) if s.trim().is_empty() => missing.to_string(),
        Some(s) => match parse_timestamp(s) {
            Some(then) => relative_time(then, now),
            None => s.to_string(),
        },
    }
}

pub fn full_date_time<Tz>(then: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    then.with_timezone(tz)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

/// `count / total × 100`, rounded to one decimal; 0 when `total` is 0.
pub fn percent_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = count as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn relative_buckets() {
        let n = now();
        assert_eq!(relative_time_in(n - Duration::seconds(30), n, &Utc), "Just now");
        assert_eq!(relative_time_in(n - Duration::minutes(1), n, &Utc), "1 minute ago");
        assert_eq!(relative_time_in(n - Duration::minutes(5), n, &Utc), "5 minutes ago");
        assert_eq!(relative_time_in(n - Duration::minutes(59), n, &Utc), "59 minutes ago");
        assert_eq!(relative_time_in(n - Duration::hours(1), n, &Utc), "1 hour ago");
        assert_eq!(relative_time_in(n - Duration::hours(2), n, &Utc), "2 hours ago");
        assert_eq!(
            relative_time_in(n - Duration::days(3), n, &Utc),
            "9/3/2025, 12:00:00 PM"
        );
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let n = now();
        assert_eq!(relative_time_in(n + Duration::minutes(10), n, &Utc), "Just now");
    }

    #[test]
    fn backend_timestamp_shapes_parse() {
        let a = parse_timestamp("2025-09-06T11:55:00.123456Z").unwrap();
        let b = parse_timestamp("2025-09-06T11:55:00+00:00").unwrap();
        let c = parse_timestamp("2025-09-06T11:55:00").unwrap();
        assert_eq!(a.timestamp(), b.timestamp());
        assert_eq!(b, c);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn labels_for_missing_and_garbage() {
        let n = now();
        assert_eq!(relative_label(None, n, "Just now"), "Just now");
        assert_eq!(relative_label(Some(""), n, "Unknown"), "Unknown");
        assert_eq!(relative_label(Some("soon"), n, "Unknown"), "soon");
        assert_eq!(
            relative_label(Some("2025-09-06T11:55:00Z"), n, "Unknown"),
            "5 minutes ago"
        );
    }

    #[test]
    fn percent_rounds_to_one_decimal_and_handles_zero_total() {
        assert_eq!(percent_of(1, 3), 33.3);
        assert_eq!(percent_of(2, 3), 66.7);
        assert_eq!(percent_of(0, 0), 0.0);
        assert_eq!(percent_of(5, 0), 0.0);
    }
}
