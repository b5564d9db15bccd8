#![deny(missing_docs)]

//! # peach-core — Foundational Types for PEACH Feeds
//!
//! This crate defines the PIES (Permitting Information Exchange Schema)
//! data model as consumed from the PEACH permit-tracking feed. Every other
//! crate in the workspace depends on `peach-core`; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for branded strings.** `Code`, `ItsmCode`,
//!    `IsoDate`, `UtcDateTime`, `UuidV7`, `Version` — all newtypes with
//!    validated constructors. A display string cannot stand in for a code.
//!
//! 2. **`Event` is a sum type.** Date-only and datetime events are distinct
//!    variants; mixing the two shapes is unrepresentable and rejected on
//!    decode.
//!
//! 3. **Pass-through wire form.** Decoding does not validate primitive
//!    patterns. Unparseable dates surface as "undetermined" downstream,
//!    and conformance is checked separately on request.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `peach-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coding;
pub mod error;
pub mod event;
pub mod identity;
pub mod record;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use coding::{CodeSet, Coding, Process, MAX_CODE_SET_LEN};
pub use error::PiesError;
pub use event::{CodingEvent, Event, ProcessEvent, RawEvent, Timed};
pub use identity::{is_code_token, Code, ItsmCode, UuidV7, Version};
pub use record::PeachRecord;
pub use temporal::{IsoDate, UtcDateTime, ISO_DATE_FORMAT};
