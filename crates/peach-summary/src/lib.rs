#![deny(missing_docs)]

//! # peach-summary — PEACH/PIES Event Interpreter
//!
//! Derives a point-in-time summary of a permit's lifecycle from the coded,
//! event-sourced records of the PEACH feed.
//!
//! ## Pipeline
//!
//! ```text
//! JSON ──decode──▶ PeachRecord ──normalize/recency──▶ current event
//!                      │                                   │
//!                      │                            codepath (stage/state)
//!                      └──codepath (milestones)──────┐     │
//!                                                    ▼     ▼
//!                                                  PeachSummary ──batch──▶ SummaryMap
//! ```
//!
//! - **normalize** (`normalize.rs`): event → UTC instant, or undetermined.
//! - **recency** (`recency.rs`): most recent event of a set; undetermined
//!   dates rank last, ties keep feed order.
//! - **codepath** (`codepath.rs`): positional stage/state fallback and the
//!   submitted/decision milestone scans.
//! - **summary** (`summary.rs`): one record → [`PeachSummary`], optionally
//!   with diagnostics.
//! - **batch** (`batch.rs`): many records → map keyed by
//!   `system_id + record_id`.
//! - **decode** / **validate**: the JSON boundary and opt-in conformance
//!   checks.
//!
//! ## Design
//!
//! Every function here is pure apart from `tracing` events. Nothing is
//! cached between calls and all inputs are borrowed immutably, so records
//! may be summarized from any number of threads.

pub mod batch;
pub mod codepath;
pub mod decode;
pub mod error;
pub mod normalize;
pub mod recency;
pub mod summary;
pub mod validate;

// ─── Summaries ──────────────────────────────────────────────────────

pub use summary::{
    summarize, summarize_with_diagnostics, EventSetKind, PeachSummary, SummaryReport,
    SummaryWarning,
};

// ─── Batches ────────────────────────────────────────────────────────

pub use batch::{
    summarize_batch, summarize_batch_with, summarize_batch_with_diagnostics, DuplicateKeyPolicy,
    ReportMap, SummaryMap,
};

// ─── Building blocks ────────────────────────────────────────────────

pub use codepath::{derive_stage_state, find_milestone, Milestone, MilestonePattern, StageState};
pub use normalize::normalize_event;
pub use recency::{compare_recency, select_most_recent, Selected};

// ─── Boundary ───────────────────────────────────────────────────────

pub use decode::{parse_record, parse_records, record_from_value, records_from_value};
pub use error::SummaryError;
pub use validate::{validate_record, IssueKind, ValidationIssue};
