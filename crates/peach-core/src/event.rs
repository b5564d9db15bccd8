//! # Events — Date-Only or Datetime Occurrences
//!
//! A PIES event is timed either by calendar dates or by zoned datetimes,
//! never both. [`Event`] makes the two shapes distinct variants, so the
//! "exactly one shape" rule holds for every constructed value.
//!
//! On the wire an event is a flat object:
//!
//! ```json
//! { "start_date": "2024-03-01", "end_date": "2024-03-02" }
//! { "start_datetime": "2024-03-01T09:30:00Z" }
//! ```
//!
//! Decoding goes through [`RawEvent`] and rejects objects that mix date and
//! datetime fields or carry neither start field.

use serde::{Deserialize, Serialize};

use crate::coding::{Coding, Process};
use crate::error::PiesError;
use crate::temporal::{IsoDate, UtcDateTime};

/// When an event happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub enum Event {
    /// Timed by calendar date.
    Date {
        /// First day of the event.
        start_date: IsoDate,
        /// Last day of the event, if it has ended.
        end_date: Option<IsoDate>,
    },
    /// Timed by zoned datetime.
    DateTime {
        /// Start instant.
        start_datetime: UtcDateTime,
        /// End instant, if the event has ended.
        end_datetime: Option<UtcDateTime>,
    },
}

impl Event {
    /// A date-only event with no end.
    pub fn on_date(start_date: IsoDate) -> Self {
        Self::Date {
            start_date,
            end_date: None,
        }
    }

    /// A datetime event with no end.
    pub fn at(start_datetime: UtcDateTime) -> Self {
        Self::DateTime {
            start_datetime,
            end_datetime: None,
        }
    }
}

/// Flat wire form of [`Event`] with every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    /// `start_date` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<IsoDate>,
    /// `end_date` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<IsoDate>,
    /// `start_datetime` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<UtcDateTime>,
    /// `end_datetime` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<UtcDateTime>,
}

impl TryFrom<RawEvent> for Event {
    type Error = PiesError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let has_date = raw.start_date.is_some() || raw.end_date.is_some();
        let has_datetime = raw.start_datetime.is_some() || raw.end_datetime.is_some();
        match (raw.start_date, raw.start_datetime) {
            _ if has_date && has_datetime => Err(PiesError::EventShape(
                "event mixes date and datetime fields".to_string(),
            )),
            (Some(start_date), None) => Ok(Self::Date {
                start_date,
                end_date: raw.end_date,
            }),
            (None, Some(start_datetime)) => Ok(Self::DateTime {
                start_datetime,
                end_datetime: raw.end_datetime,
            }),
            _ => Err(PiesError::EventShape(
                "event needs start_date or start_datetime".to_string(),
            )),
        }
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Date {
                start_date,
                end_date,
            } => Self {
                start_date: Some(start_date),
                end_date,
                ..Self::default()
            },
            Event::DateTime {
                start_datetime,
                end_datetime,
            } => Self {
                start_datetime: Some(start_datetime),
                end_datetime,
                ..Self::default()
            },
        }
    }
}

/// A transition event classified by a [`Process`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEvent {
    /// Stage/state classification of the transition.
    pub process: Process,
    /// When the transition happened.
    pub event: Event,
}

/// An on-hold event classified by a plain [`Coding`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingEvent {
    /// Reason the permit is on hold.
    pub coding: Coding,
    /// When the hold applied.
    pub event: Event,
}

/// Access to the timing of an event-carrying record.
pub trait Timed {
    /// The event timing.
    fn event(&self) -> &Event;
}

impl Timed for ProcessEvent {
    fn event(&self) -> &Event {
        &self.event
    }
}

impl Timed for CodingEvent {
    fn event(&self) -> &Event {
        &self.event
    }
}
