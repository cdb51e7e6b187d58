use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%a, %d %b %Y %H:%M:%S %z",
    "%d %b %Y %H:%M:%S %z",
    "%a %b %d %H:%M:%S %z %Y",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%a, %d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%b %d, %Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
];

const UTC_SUFFIXES: &[&str] = &[" GMT", " UTC", " UT", "Z"];

/// Best-effort parse of a feed timestamp.
///
/// Tries RFC 2822 and RFC 3339 first, then a handful of common layouts.
/// Timestamps without an offset (or with a `GMT`/`UTC`/`Z` suffix chrono
/// cannot read) are taken as UTC; bare dates become midnight UTC. Returns
/// `None` instead of failing.
pub fn parse_published(raw: &str) -> Option<DateTime<FixedOffset>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    let naive_text = strip_utc_suffix(text);
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(naive_text, format) {
            return Some(as_utc(naive));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(naive_text, format) {
            return date.and_hms_opt(0, 0, 0).map(as_utc);
        }
    }

    None
}

fn strip_utc_suffix(text: &str) -> &str {
    UTC_SUFFIXES
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
        .map(str::trim_end)
        .unwrap_or(text)
}

fn as_utc(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    DateTime::<FixedOffset>::from(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc2822_gmt() {
        let dt = parse_published("Mon, 06 Jan 2025 14:30:00 GMT").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 6);
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_rfc3339_keeps_offset() {
        let dt = parse_published("2025-01-06T23:15:00-05:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(dt.naive_local().date(), NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_parse_naive_is_utc() {
        let dt = parse_published("2025-01-06 08:00:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.hour(), 8);

        let dt = parse_published("2025-01-06 08:00:00 UTC").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_published("January 6, 2025").unwrap();
        assert_eq!(dt.naive_local().date(), NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(dt.hour(), 0);

        assert!(parse_published("2025-01-06").is_some());
    }

    #[test]
    fn test_parse_failure() {
        assert!(parse_published("").is_none());
        assert!(parse_published("   ").is_none());
        assert!(parse_published("yesterday-ish").is_none());
        assert!(parse_published("2025-13-45").is_none());
    }
}
