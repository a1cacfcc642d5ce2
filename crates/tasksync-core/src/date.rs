//! Conversion between the display form of a due date (`DD/MM/YYYY`) and the
//! storage form (epoch milliseconds, midnight UTC).
//!
//! The persistence layer only ever stores the numeric form and clients only
//! ever see the string form. These two functions are the only crossing point.

use chrono::{DateTime, Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("expected DD/MM/YYYY, got {0:?}")]
    Malformed(String),

    #[error("{0:?} is not a calendar date")]
    NotACalendarDate(String),
}

/// Parse a `DD/MM/YYYY` string into epoch milliseconds at midnight UTC.
pub fn to_timestamp(display: &str) -> Result<i64, DateError> {
    let malformed = || DateError::Malformed(display.to_string());

    let parts: Vec<&str> = display.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(malformed());
    };
    let day: u32 = parse_component(day).ok_or_else(malformed)?;
    let month: u32 = parse_component(month).ok_or_else(malformed)?;
    let year: i32 = parse_component(year).ok_or_else(malformed)?;

    let midnight = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DateError::NotACalendarDate(display.to_string()))?;
    Ok(midnight.and_utc().timestamp_millis())
}

/// Render epoch milliseconds as `DD/MM/YYYY`.
///
/// `None` in gives `None` out: a task without a due date is a distinct state
/// from one with a bad date. A timestamp outside chrono's range also renders
/// as `None`.
pub fn to_display(timestamp: Option<i64>) -> Option<String> {
    let at = DateTime::from_timestamp_millis(timestamp?)?;
    Some(format!("{:02}/{:02}/{:04}", at.day(), at.month(), at.year()))
}

fn parse_component<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_zero() {
        assert_eq!(to_timestamp("01/01/1970").unwrap(), 0);
        assert_eq!(to_display(Some(0)).as_deref(), Some("01/01/1970"));
    }

    #[test]
    fn known_date_maps_to_midnight_utc() {
        assert_eq!(to_timestamp("01/06/2024").unwrap(), 1_717_200_000_000);
    }

    #[test]
    fn display_pads_day_and_month() {
        let ts = to_timestamp("5/3/2024").unwrap();
        assert_eq!(to_display(Some(ts)).as_deref(), Some("05/03/2024"));
    }

    #[test]
    fn every_day_round_trips() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            let mut day = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            while day.year() == year {
                let s = day.format("%d/%m/%Y").to_string();
                let ts = to_timestamp(&s).unwrap();
                assert_eq!(to_display(Some(ts)).as_deref(), Some(s.as_str()));
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn leap_day_only_in_leap_years() {
        assert!(to_timestamp("29/02/2024").is_ok());
        assert_eq!(
            to_timestamp("29/02/2023"),
            Err(DateError::NotACalendarDate("29/02/2023".into()))
        );
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        for s in ["31/04/2024", "00/01/2024", "15/13/2024", "15/00/2024"] {
            assert!(
                matches!(to_timestamp(s), Err(DateError::NotACalendarDate(_))),
                "{s} should not be a calendar date"
            );
        }
    }

    #[test]
    fn malformed_strings_are_rejected() {
        for s in ["", "2024-06-01", "01/06", "01/06/2024/1", "aa/bb/cccc", "01/-6/2024", " 1/06/2024", "01//2024"] {
            assert!(
                matches!(to_timestamp(s), Err(DateError::Malformed(_))),
                "{s:?} should be malformed"
            );
        }
    }

    #[test]
    fn missing_timestamp_has_no_display() {
        assert_eq!(to_display(None), None);
    }
}
