//! # Temporal Types — PIES Date and Datetime Strings
//!
//! PIES events carry either a calendar date (`2024-03-01`) or a zoned
//! datetime (`2024-03-01T09:30:00-08:00`). Both are kept as the string
//! supplied by the feed and parsed on demand, because an unparseable date
//! must degrade to "undetermined" rather than reject the whole record.
//!
//! ## Normalization
//!
//! - [`UtcDateTime::to_instant()`] converts any RFC 3339 offset to UTC and
//!   preserves the instant exactly (sub-seconds included).
//! - [`IsoDate::to_instant()`] is midnight UTC on the calendar date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PiesError;

/// Calendar date format used by PIES date-only events.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// A date-only PIES value, `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IsoDate(String);

impl IsoDate {
    /// Construct a date, rejecting values that are not `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`PiesError::InvalidDate`] if `s` is not a valid calendar date.
    pub fn new(s: impl Into<String>) -> Result<Self, PiesError> {
        let s = s.into();
        parse_date(&s).map_err(|reason| PiesError::InvalidDate {
            value: s.clone(),
            reason,
        })?;
        Ok(Self(s))
    }

    /// Parse the calendar date, if well-formed.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        parse_date(&self.0).ok()
    }

    /// Midnight UTC on this date, if the date parses.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        self.to_naive()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Whether the wrapped value parses as a calendar date.
    pub fn is_well_formed(&self) -> bool {
        self.to_naive().is_some()
    }

    /// Access the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// chrono alone accepts unpadded fields, a sign and short years.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    if !has_date_shape(s) {
        return Err("expected YYYY-MM-DD".to_string());
    }
    NaiveDate::parse_from_str(s, ISO_DATE_FORMAT).map_err(|e| e.to_string())
}

fn has_date_shape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, &c)| match i {
            4 | 7 => c == b'-',
            _ => c.is_ascii_digit(),
        })
}

impl std::fmt::Display for IsoDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A zoned PIES datetime, RFC 3339 with any offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtcDateTime(String);

impl UtcDateTime {
    /// Construct a datetime, rejecting values that are not RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns [`PiesError::InvalidDateTime`] if `s` does not parse.
    pub fn new(s: impl Into<String>) -> Result<Self, PiesError> {
        let s = s.into();
        DateTime::parse_from_rfc3339(&s).map_err(|e| PiesError::InvalidDateTime {
            value: s.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self(s))
    }

    /// The instant in UTC, if the value parses.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.0)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether the wrapped value parses as RFC 3339.
    pub fn is_well_formed(&self) -> bool {
        self.to_instant().is_some()
    }

    /// Access the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UtcDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
