//! # PEACH Record Messages
//!
//! A [`PeachRecord`] is one PIES record message from the PEACH feed: the
//! full event history of a single permit record in a source system.
//!
//! ## Identity
//!
//! A record is identified by `(system_id, record_id)`. The batch lookup
//! table keys summaries by the two concatenated with no delimiter, see
//! [`PeachRecord::composite_key()`].

use serde::{Deserialize, Serialize};

use crate::event::{CodingEvent, ProcessEvent};
use crate::identity::{ItsmCode, UuidV7, Version};

/// A PIES record message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeachRecord {
    /// Message transaction identifier.
    pub transaction_id: UuidV7,
    /// PIES schema version of the message.
    pub version: Version,
    /// Message kind, e.g. `RecordLinkage` or `Record`.
    pub kind: String,
    /// Source system that owns the record.
    pub system_id: ItsmCode,
    /// Record identifier within the source system.
    pub record_id: String,
    /// Record kind, e.g. `Permit`.
    pub record_kind: String,
    /// Lifecycle transitions in feed order. Non-empty in a valid record.
    pub process_event_set: Vec<ProcessEvent>,
    /// Holds placed on the record, in feed order.
    #[serde(default)]
    pub on_hold_event_set: Vec<CodingEvent>,
}

impl PeachRecord {
    /// Key of this record's slot in a batch summary map.
    ///
    /// `system_id` and `record_id` concatenated with no delimiter.
    pub fn composite_key(&self) -> String {
        format!("{}{}", self.system_id, self.record_id)
    }
}
