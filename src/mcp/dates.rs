//! Strict `YYYY-MM-DD` handling for tool arguments

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::client::{CanvasError, Result};

/// Parse a date that is exactly `YYYY-MM-DD`.
///
/// Anything else is rejected, including ISO variants such as `2024-3-31` or
/// full timestamps.
pub fn validate_iso_date(value: &str) -> Result<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(invalid_format(value));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid_format(value))
}

fn invalid_format(value: &str) -> CanvasError {
    CanvasError::validation(format!(
        "Invalid date format: '{value}'. Date must be in YYYY-MM-DD format"
    ))
}

/// Inclusive UTC bounds covering both whole days
pub fn date_range(start_date: &str, end_date: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = validate_iso_date(start_date)?;
    let end = validate_iso_date(end_date)?;

    if start > end {
        return Err(CanvasError::validation(format!(
            "Start date {start_date} must be before end date {end_date}"
        )));
    }

    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    Ok((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(end_of_day).and_utc(),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn accepts_plain_dates() {
        let date = validate_iso_date("2024-03-31").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 31));
    }

    #[test]
    fn rejects_everything_else() {
        for input in [
            "invalid_date",
            "invalid",
            "2024/03/31",
            "2024-3-31",
            "24-03-31",
            "2024-03",
            "2024-13-31",
            "2024-03-32",
            "2024-03-31T00:00:00Z",
            "+024-03-31",
        ] {
            let err = validate_iso_date(input).unwrap_err();
            assert!(
                err.to_string().contains("Date must be in YYYY-MM-DD format"),
                "{input}: {err}"
            );
        }
    }

    #[test]
    fn range_must_be_ordered() {
        let err = date_range("2024-03-31", "2024-03-01").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Start date 2024-03-31"));
        assert!(message.contains("must be before end date 2024-03-01"));

        let (start, end) = date_range("2024-03-01", "2024-03-31").unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-03-31T23:59:59+00:00");
    }

    #[test]
    fn same_day_range_is_allowed() {
        assert!(date_range("2024-03-01", "2024-03-01").is_ok());
    }
}
