//! # Record Summarizer
//!
//! Reduces one [`PeachRecord`] to a [`PeachSummary`]: the permit's current
//! stage and state, when that status last changed, and the submitted and
//! decision dates.
//!
//! ## Source of the current status
//!
//! 1. The most recent process event, if the record has any.
//! 2. Otherwise the most recent on-hold event.
//! 3. Otherwise stage, state and `statusChangeDate` are undetermined.
//!
//! An event with an unparseable date still supplies stage and state; only
//! `statusChangeDate` is lost.
//!
//! Every field of the summary is optional. Absence means the value could
//! not be determined from the record; it is never an error. Use
//! [`summarize_with_diagnostics()`] to learn why a field is absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use peach_core::{Code, CodeSet, PeachRecord};

use crate::codepath::{derive_stage_state, find_milestone, Milestone};
use crate::normalize::normalize_event;
use crate::recency::select_most_recent;

/// Point-in-time summary of a permit record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeachSummary {
    /// Current stage code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Code>,
    /// Current state code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Code>,
    /// When the current status took effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_change_date: Option<DateTime<Utc>>,
    /// When the application was submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<DateTime<Utc>>,
    /// When a decision was made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<DateTime<Utc>>,
}

/// Which event set of a record an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSetKind {
    /// `process_event_set`.
    Process,
    /// `on_hold_event_set`.
    OnHold,
}

impl std::fmt::Display for EventSetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Process => "process_event_set",
            Self::OnHold => "on_hold_event_set",
        })
    }
}

/// Why part of a summary could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum SummaryWarning {
    /// An event's start date or datetime did not parse.
    UnparseableEventDate {
        /// Set containing the event.
        set: EventSetKind,
        /// Position in the set.
        index: usize,
    },
    /// The record has no process events.
    EmptyProcessEventSet,
    /// The record has no events at all; stage and state are undetermined.
    NoCurrentEvent,
    /// The current event has an empty code path.
    EmptyCodeSet {
        /// Set containing the event.
        set: EventSetKind,
        /// Position in the set.
        index: usize,
    },
    /// Stage and state came from an on-hold event.
    StatusFromOnHoldEvent {
        /// Position in `on_hold_event_set`.
        index: usize,
    },
    /// No process event matched the milestone patterns.
    MilestoneNotFound {
        /// The missing milestone.
        milestone: Milestone,
    },
    /// The event matching a milestone has an unparseable date.
    MilestoneDateUndetermined {
        /// The milestone.
        milestone: Milestone,
        /// Position of the matching event in `process_event_set`.
        index: usize,
    },
}

impl std::fmt::Display for SummaryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnparseableEventDate { set, index } => {
                write!(f, "{set}/{index}: event date is not parseable")
            }
            Self::EmptyProcessEventSet => f.write_str("process_event_set is empty"),
            Self::NoCurrentEvent => f.write_str("record has no events; status undetermined"),
            Self::EmptyCodeSet { set, index } => write!(f, "{set}/{index}: code_set is empty"),
            Self::StatusFromOnHoldEvent { index } => {
                write!(f, "status taken from on_hold_event_set/{index}")
            }
            Self::MilestoneNotFound { milestone } => write!(f, "no {milestone} event found"),
            Self::MilestoneDateUndetermined { milestone, index } => write!(
                f,
                "process_event_set/{index}: {milestone} event date is not parseable"
            ),
        }
    }
}

/// A summary together with the reasons any of its fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// The summary, identical to [`summarize()`]'s result.
    pub summary: PeachSummary,
    /// Diagnostics in the order they were found.
    pub warnings: Vec<SummaryWarning>,
}

/// Summarize one record.
pub fn summarize(record: &PeachRecord) -> PeachSummary {
    summarize_with_diagnostics(record).summary
}

/// Summarize one record, collecting diagnostics for undetermined fields.
pub fn summarize_with_diagnostics(record: &PeachRecord) -> SummaryReport {
    let mut warnings = Vec::new();
    collect_date_warnings(record, &mut warnings);

    let mut summary = PeachSummary::default();

    if record.process_event_set.is_empty() {
        warnings.push(SummaryWarning::EmptyProcessEventSet);
    }

    let current: Option<(EventSetKind, usize, &CodeSet, Option<DateTime<Utc>>)> =
        match select_most_recent(&record.process_event_set) {
            Some(s) => Some((
                EventSetKind::Process,
                s.index,
                s.item.process.code_set(),
                s.instant,
            )),
            None => select_most_recent(&record.on_hold_event_set).map(|s| {
                warnings.push(SummaryWarning::StatusFromOnHoldEvent { index: s.index });
                (EventSetKind::OnHold, s.index, &s.item.coding.code_set, s.instant)
            }),
        };

    match current {
        Some((set, index, code_set, instant)) => {
            match derive_stage_state(code_set) {
                Some(ss) => {
                    summary.stage = Some(ss.stage);
                    summary.state = Some(ss.state);
                }
                None => warnings.push(SummaryWarning::EmptyCodeSet { set, index }),
            }
            summary.status_change_date = instant;
        }
        None => warnings.push(SummaryWarning::NoCurrentEvent),
    }

    summary.submitted_date = milestone_date(record, Milestone::Submitted, &mut warnings);
    summary.decision_date = milestone_date(record, Milestone::Decision, &mut warnings);

    tracing::debug!(
        record = %record.composite_key(),
        stage = ?summary.stage.as_ref().map(Code::as_str),
        state = ?summary.state.as_ref().map(Code::as_str),
        warnings = warnings.len(),
        "summarized PEACH record"
    );

    SummaryReport { summary, warnings }
}

fn milestone_date(
    record: &PeachRecord,
    milestone: Milestone,
    warnings: &mut Vec<SummaryWarning>,
) -> Option<DateTime<Utc>> {
    let Some((index, event)) = find_milestone(&record.process_event_set, milestone) else {
        warnings.push(SummaryWarning::MilestoneNotFound { milestone });
        return None;
    };
    let instant = normalize_event(&event.event);
    if instant.is_none() {
        warnings.push(SummaryWarning::MilestoneDateUndetermined { milestone, index });
    }
    instant
}

fn collect_date_warnings(record: &PeachRecord, warnings: &mut Vec<SummaryWarning>) {
    let process = record
        .process_event_set
        .iter()
        .map(|e| &e.event)
        .enumerate()
        .map(|(index, event)| (EventSetKind::Process, index, event));
    let on_hold = record
        .on_hold_event_set
        .iter()
        .map(|e| &e.event)
        .enumerate()
        .map(|(index, event)| (EventSetKind::OnHold, index, event));
    for (set, index, event) in process.chain(on_hold) {
        if normalize_event(event).is_none() {
            warnings.push(SummaryWarning::UnparseableEventDate { set, index });
        }
    }
}
