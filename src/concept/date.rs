use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use thiserror::Error;

/// chrono format string for OMOP vocabulary dates
pub const OMOP_DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("expected 8 digits in YYYYMMDD format, got '{0}'")]
    InvalidFormat(String),

    #[error("'{0}' is not a valid calendar date")]
    InvalidDate(String),
}

/// Parse a `YYYYMMDD` date into midnight UTC.
///
/// Exactly eight ASCII digits are accepted. chrono alone would take
/// shorter day/month fields (`2020011`), so the width is checked first.
pub fn parse_omop_date(value: &str) -> Result<DateTime<Utc>, DateParseError> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateParseError::InvalidFormat(value.to_string()));
    }

    let date = NaiveDate::parse_from_str(value, OMOP_DATE_FORMAT)
        .map_err(|_| DateParseError::InvalidDate(value.to_string()))?;

    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DateParseError::InvalidDate(value.to_string()))?;

    Ok(Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
#[path = "date_test.rs"]
mod tests;
