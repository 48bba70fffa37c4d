//! Validation helpers for DTOs.

use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

const SUBMISSION_DATE_FORMAT: &'static [BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Error raised when a submitted date cannot be interpreted.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid date `{raw}`; expected YYYY-MM-DD")]
pub struct InvalidDate {
    raw: String,
}

/// Parse a `YYYY-MM-DD` submission date into a UTC midnight timestamp.
///
/// # Examples
///
/// ```ignore
/// parse_submission_date("2024-01-31") // Ok
/// parse_submission_date("2024-1-31")  // Err - unpadded month
/// parse_submission_date("31/01/2024") // Err - wrong format
/// ```
pub fn parse_submission_date(raw: &str) -> Result<OffsetDateTime, InvalidDate> {
    Date::parse(raw, SUBMISSION_DATE_FORMAT)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| InvalidDate {
            raw: raw.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parse_valid_date() {
        assert_eq!(
            parse_submission_date("2024-01-31").unwrap(),
            datetime!(2024-01-31 00:00:00 UTC)
        );
    }

    #[test]
    fn parse_rejects_unpadded_fields() {
        assert!(parse_submission_date("2024-1-31").is_err());
        assert!(parse_submission_date("2024-01-3").is_err());
    }

    #[test]
    fn parse_rejects_other_shapes() {
        assert!(parse_submission_date("").is_err());
        assert!(parse_submission_date("31/01/2024").is_err());
        assert!(parse_submission_date("2024-01-31T00:00:00Z").is_err());
        assert!(parse_submission_date("yesterday").is_err());
    }

    #[test]
    fn parse_rejects_impossible_dates() {
        assert!(parse_submission_date("2024-02-30").is_err());
        assert!(parse_submission_date("2024-13-01").is_err());
    }
}
