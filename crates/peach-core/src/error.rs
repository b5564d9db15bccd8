//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error type raised by the validated constructors of the PIES
//! primitives. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.
//!
//! ## Design
//!
//! - Primitive errors carry the offending value so a caller can report it
//!   without re-reading the input document.
//! - Missing or unparseable data in a *decoded* record is never an error
//!   here. The summarizer degrades such fields to "undetermined"; only
//!   explicit construction and structural shape violations fail.

use thiserror::Error;

/// Top-level error type for PIES primitives and data-model construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PiesError {
    /// A code token does not match `^[A-Z][A-Z0-9]*(_[A-Z0-9]+)*$`.
    #[error("invalid PIES code {0:?}: expected upper-case token like APPLICATION or PRE_APPLICATION")]
    InvalidCode(String),

    /// An ITSM system code does not match the code token pattern.
    #[error("invalid ITSM code {0:?}")]
    InvalidItsmCode(String),

    /// A code set has the wrong number of elements.
    #[error("code set must have between 1 and 3 codes, got {len}")]
    InvalidCodeSet {
        /// Number of codes supplied.
        len: usize,
    },

    /// A date-only value is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid ISO date {value:?}: {reason}")]
    InvalidDate {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A datetime value is not valid RFC 3339.
    #[error("invalid RFC 3339 datetime {value:?}: {reason}")]
    InvalidDateTime {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A transaction identifier is not a version 7 UUID.
    #[error("invalid UUIDv7 {value:?}: {reason}")]
    InvalidUuidV7 {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A message version is not `MAJOR.MINOR.PATCH`.
    #[error("invalid version {0:?}: expected MAJOR.MINOR.PATCH")]
    InvalidVersion(String),

    /// A code system is not an absolute URI.
    #[error("invalid code system URI {value:?}: {reason}")]
    InvalidUri {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// An event carries both date and datetime fields, or neither.
    #[error("invalid event shape: {0}")]
    EventShape(String),
}
