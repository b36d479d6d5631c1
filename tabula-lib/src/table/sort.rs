//! Newest-first ordering of loaded rows

use std::borrow::Borrow;
use std::cmp::Reverse;

use chrono::DateTime;
use chrono::Utc;

use crate::datetime::parse_timestamp;
use crate::model::Row;
use crate::model::Value;

/// Resolves a row's recency timestamp by probing `keys` in order.
///
/// The first key holding a timestamp (or text that parses as one) wins.
/// Rows without any resolve to the Unix epoch.
pub fn recency(row: &Row, keys: &[String]) -> DateTime<Utc> {
    keys.iter()
        .find_map(|key| match row.get(key)? {
            Value::Timestamp(dt) => Some(*dt),
            Value::Text(s) => parse_timestamp(s),
            _ => None,
        })
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Sorts rows newest first. Rows with equal timestamps keep their order.
pub fn sort_by_recency<R: Borrow<Row>>(rows: &mut [R], keys: &[String]) {
    rows.sort_by_cached_key(|row| Reverse(recency(row.borrow(), keys)));
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn keys() -> Vec<String> {
        vec!["created_at".into(), "logged_at".into()]
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_created_probed_before_logged() {
        let row = Row::new().set("created_at", at(3)).set("logged_at", at(9));
        assert_eq!(recency(&row, &keys()), at(3));

        let row = Row::new().set("logged_at", at(9));
        assert_eq!(recency(&row, &keys()), at(9));

        let row = Row::new().set("created_at", Value::Null).set("logged_at", "2024-05-07");
        assert_eq!(recency(&row, &keys()), at(7));
    }

    #[test]
    fn test_missing_timestamp_is_epoch() {
        assert_eq!(recency(&Row::new(), &keys()), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_stable_descending() {
        let mut rows = vec![
            Row::new().set("name", "a").set("created_at", at(1)),
            Row::new().set("name", "b"),
            Row::new().set("name", "c").set("created_at", at(5)),
            Row::new().set("name", "d").set("created_at", at(1)),
            Row::new().set("name", "e"),
            Row::new().set("name", "f").set("logged_at", at(3)),
        ];
        sort_by_recency(&mut rows, &keys());

        let names: Vec<&str> = rows.iter().map(|r| r.get_text("name").unwrap().unwrap()).collect();
        assert_eq!(names, vec!["c", "f", "a", "d", "b", "e"]);
    }
}
