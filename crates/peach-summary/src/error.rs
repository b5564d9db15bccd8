//! Fatal interpreter errors.
//!
//! Partial data never produces one of these; it degrades to undetermined
//! summary fields. These errors mean the upstream feed broke its contract.

use thiserror::Error;

/// Errors raised while decoding or batch-summarizing PEACH records.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// The document is not valid JSON, or a record does not have the PIES
    /// record shape (missing `process_event_set`, mixed event fields, ...).
    #[error("malformed PIES document: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level JSON value is neither a record object nor an array.
    #[error("expected a PIES record object or an array of records, got {found}")]
    UnexpectedDocument {
        /// JSON type that was found.
        found: &'static str,
    },

    /// A record at a given position of a batch failed to decode.
    #[error("record {index} is malformed: {source}")]
    Record {
        /// Position of the record in the batch.
        index: usize,
        /// Decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// Two records share a composite key under the reject policy.
    #[error("duplicate record key {key:?} at positions {first_index} and {duplicate_index}")]
    DuplicateKey {
        /// The shared `system_id + record_id` key.
        key: String,
        /// Position of the first record with the key.
        first_index: usize,
        /// Position of the duplicate.
        duplicate_index: usize,
    },
}
