//! # Event Date Normalizer
//!
//! Reduces an [`Event`] to one comparable UTC instant.
//!
//! | Event shape | Instant                                   |
//! |-------------|-------------------------------------------|
//! | `DateTime`  | `start_datetime`, converted to UTC        |
//! | `Date`      | midnight UTC on `start_date`              |
//! | unparseable | `None` ("undetermined")                   |
//!
//! Only the start of an event is used; end fields never affect ordering.

use chrono::{DateTime, Utc};
use peach_core::Event;

/// Normalize an event to the instant it started, if determinable.
pub fn normalize_event(event: &Event) -> Option<DateTime<Utc>> {
    match event {
        Event::DateTime { start_datetime, .. } => start_datetime.to_instant(),
        Event::Date { start_date, .. } => start_date.to_instant(),
    }
}
