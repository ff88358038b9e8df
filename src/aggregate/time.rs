//! Calendar bucket extraction.
//!
//! Day-of-week numbering follows ISO 8601 via chrono: Monday=1 .. Sunday=7.
//! The weekend predicate is defined structurally on `Weekday`, so no numeric
//! convention leaks into call sites.

use chrono::{Datelike, NaiveDate, Weekday};

pub fn year(date: NaiveDate) -> i64 {
    date.year() as i64
}

/// 1..=12
pub fn month(date: NaiveDate) -> i64 {
    date.month() as i64
}

/// ISO 8601: Monday=1 .. Sunday=7.
pub fn day_of_week(date: NaiveDate) -> i64 {
    date.weekday().number_from_monday() as i64
}

/// Weekend means Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_extraction() {
        // 2025-01-15 is a Wednesday
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(year(date), 2025);
        assert_eq!(month(date), 1);
        assert_eq!(day_of_week(date), 3);
        assert!(!is_weekend(date));
    }

    #[test]
    fn test_weekend_convention() {
        let saturday = NaiveDate::from_ymd_opt(2025, 1, 18).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2025, 1, 19).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();

        assert!(is_weekend(saturday));
        assert!(is_weekend(sunday));
        assert!(!is_weekend(monday));
        assert_eq!(day_of_week(saturday), 6);
        assert_eq!(day_of_week(sunday), 7);
        assert_eq!(day_of_week(monday), 1);
    }
}
