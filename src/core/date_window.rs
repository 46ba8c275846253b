//! Calendar-date windows centered on a start date.

use chrono::{Duration, NaiveDate, ParseError};

/// Parse a `YYYY-MM-DD` start date.
///
/// The only failure mode of the window computation is a malformed start
/// date, surfaced as a [`chrono::ParseError`].
pub fn parse_start_date(start_date: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
}

/// Every calendar day from `start - radius` to `start + radius` inclusive,
/// ascending.
///
/// Pure; the returned window always has `2 * radius + 1` entries.
pub fn dates(start: NaiveDate, radius: i64) -> Vec<NaiveDate> {
    (-radius..=radius)
        .map(|offset| start + Duration::days(offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_length_and_order() {
        let start = parse_start_date("2025-03-15").unwrap();
        let window = dates(start, 15);
        assert_eq!(window.len(), 31);
        assert!(window.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(window[0].to_string(), "2025-02-28");
        assert_eq!(window[15], start);
        assert_eq!(window[30].to_string(), "2025-03-30");
    }

    #[test]
    fn test_zero_radius_is_just_the_start_date() {
        let start = parse_start_date("2025-01-10").unwrap();
        assert_eq!(dates(start, 0), vec![start]);
    }

    #[test]
    fn test_window_crosses_month_and_year_boundaries() {
        let start = parse_start_date("2025-01-01").unwrap();
        let window = dates(start, 2);
        assert_eq!(window[0].to_string(), "2024-12-30");
        assert_eq!(window[4].to_string(), "2025-01-03");
    }

    #[test]
    fn test_invalid_start_date_is_a_parse_error() {
        assert!(parse_start_date("15-03-2025").is_err());
        assert!(parse_start_date("not a date").is_err());
        assert!(parse_start_date("2025-02-30").is_err());
    }
}
