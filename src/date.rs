use jiff::civil::{Date, date};

/// First date the exchange service has rates for.
pub const EARLIEST: Date = date(2025, 1, 1);
/// Last date the exchange service has rates for.
pub const LATEST: Date = date(2025, 9, 15);

/// Returns whether `text` is a `YYYY-MM-DD` date inside the supported window.
pub fn validate(text: &str) -> bool {
    parse_query_date(text).is_some()
}

/// Parse a `YYYY-MM-DD` date, returning `None` if the text is malformed, names an impossible
/// calendar day, or falls outside [`EARLIEST`]..=[`LATEST`].
pub fn parse_query_date(text: &str) -> Option<Date> {
    if !has_date_shape(text) {
        return None;
    }
    let parsed = Date::strptime("%Y-%m-%d", text).ok()?;
    (EARLIEST..=LATEST).contains(&parsed).then_some(parsed)
}

/// Four digit year, two digit month and day, dash separated.
fn has_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::{parse_query_date, validate};
    use jiff::civil::date;

    #[test]
    fn test_window_boundaries() {
        assert!(validate("2025-01-01"));
        assert!(validate("2025-09-15"));
        assert!(validate("2025-03-15"));

        assert!(!validate("2024-12-31"));
        assert!(!validate("2025-09-16"));
        assert!(!validate("2026-01-01"));
        assert!(!validate("1999-06-01"));
    }

    /// Anything that isn't exactly `YYYY-MM-DD` is rejected without panicking.
    #[test]
    fn test_malformed_dates() {
        for text in [
            "",
            "2025/03/15",
            "2025.03.15",
            "15-03-2025",
            "2025-3-15",
            "2025-03-5",
            "20250315",
            "2025-03-15T00:00",
            " 2025-03-15",
            "2025-03-15 ",
            "+2025-03-15",
            "2025-0a-15",
            "yyyy-mm-dd",
            "2025-02-30",
            "2025-02-29",
            "2025-04-31",
            "2025-13-01",
            "2025-00-10",
            "2025-06-00",
            "２０２５-03-15",
        ] {
            assert!(!validate(text), "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_returns_calendar_date() {
        assert_eq!(parse_query_date("2025-06-01"), Some(date(2025, 6, 1)));
        assert_eq!(parse_query_date("2025-06-31"), None);
    }
}
