//! Timestamp parsing for spreadsheet input.
//!
//! Spreadsheets export dates in whatever format the operator's locale
//! prefers. [`parse_timestamp`] tries the unambiguous ISO-style formats first
//! and then falls back to a month/day/year-first heuristic for numeric
//! `a-b-c` and `a/b/c` dates.

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a date or date-time string into a UTC timestamp.
///
/// Standard formats are tried first: RFC 3339, ISO 8601 date-times without an
/// offset (read as UTC) and `YYYY-MM-DD` / `YYYY/MM/DD` dates. Otherwise the
/// value is split on `-` or `/` into three numbers `a`, `b`, `c`:
///
/// - `a <= 12`, `b <= 31`, `c >= 1900` reads as month-day-year
/// - else `b <= 12`, `a <= 31`, `c >= 1900` reads as day-month-year
///
/// Anything else, or a calendar date that does not exist, returns `None`.
/// Ambiguous input such as `03-04-2024` resolves to March 4.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tabula_lib::datetime::parse_timestamp;
///
/// let jan_2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
/// assert_eq!(parse_timestamp("01-02-2024"), Some(jan_2));
/// assert_eq!(parse_timestamp("2024-01-02"), Some(jan_2));
/// assert_eq!(parse_timestamp("31/12/2023").map(|d| d.to_rfc3339()),
///            Some("2023-12-31T00:00:00+00:00".to_string()));
/// assert_eq!(parse_timestamp("next tuesday"), None);
/// ```
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    parse_standard(raw).or_else(|| parse_numeric_date(raw))
}

/// Parses the unambiguous formats only.
pub fn parse_standard(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if !starts_with_year(raw) {
        return None;
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(midnight(date));
        }
    }

    None
}

/// `%Y` accepts short years when parsing, so `01-02-24` would read as year 1.
fn starts_with_year(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && matches!(bytes[4], b'-' | b'/')
}

fn parse_numeric_date(raw: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<u32> = raw
        .split(['-', '/'])
        .map(|p| p.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;

    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    let (a, b, c) = (*a, *b, *c);
    let year = i32::try_from(c).ok()?;

    let date = if a <= 12 && b <= 31 && c >= 1900 {
        NaiveDate::from_ymd_opt(year, a, b)
    } else if b <= 12 && a <= 31 && c >= 1900 {
        NaiveDate::from_ymd_opt(year, b, a)
    } else {
        None
    }?;

    Some(midnight(date))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_month_day_year_checked_first() {
        assert_eq!(parse_timestamp("01-02-2024"), Some(ymd(2024, 1, 2)));
        assert_eq!(parse_timestamp("03/04/2024"), Some(ymd(2024, 3, 4)));
    }

    #[test]
    fn test_day_month_year_fallback() {
        assert_eq!(parse_timestamp("25-12-2023"), Some(ymd(2023, 12, 25)));
        assert_eq!(parse_timestamp("13/01/2024"), Some(ymd(2024, 1, 13)));
    }

    #[test]
    fn test_standard_formats() {
        assert_eq!(parse_timestamp("2024-02-29"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_timestamp("2024/02/29"), Some(ymd(2024, 2, 29)));
        assert_eq!(
            parse_timestamp("2024-02-29T10:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 8, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-02-29 10:30:00"),
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 10, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-02-29T10:30:00.250Z").map(|d| d.timestamp_millis() % 1000),
            Some(250)
        );
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("soon"), None);
        assert_eq!(parse_timestamp("13-13-2024"), None);
        assert_eq!(parse_timestamp("01-02-24"), None);
        assert_eq!(parse_timestamp("01-02"), None);
        assert_eq!(parse_timestamp("1-2-3-2024"), None);
    }

    #[test]
    fn test_impossible_calendar_date() {
        assert_eq!(parse_timestamp("02-30-2024"), None);
        assert_eq!(parse_timestamp("00-10-2024"), None);
    }
}
