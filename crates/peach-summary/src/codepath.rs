//! # Code-Path Resolver
//!
//! Two independent readings of a PIES code path `[phase, stage?, state?]`.
//!
//! ## Stage / State
//!
//! Positional fallback over the path of the current event:
//!
//! ```text
//! code_set                 stage    state
//! [A]                      A        A
//! [A, B]                   B        B
//! [A, B, C]                B        C
//! ```
//!
//! ## Milestones
//!
//! The whole `process_event_set` is scanned in feed order and the first
//! event whose path matches a milestone pattern supplies its date. Dates
//! do not influence which event matches.
//!
//! | Milestone | Patterns                                                     |
//! |-----------|--------------------------------------------------------------|
//! | submitted | exactly `[APPLICATION, PRE_APPLICATION, SUBMITTED]`          |
//! | decision  | prefix `[APPLICATION, DECISION]`, prefix `[APPLICATION, ISSUANCE]`, exactly `[APPLICATION, ISSUED]` |
//!
//! Submitted is exact-length while decision is prefix-based. The asymmetry
//! mirrors how PEACH publishes these codes and is kept as-is.

use peach_core::{Code, CodeSet, ProcessEvent};
use serde::{Deserialize, Serialize};

/// How a milestone pattern is compared with a code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestonePattern {
    /// The path equals the pattern, length included.
    Exact(&'static [&'static str]),
    /// The path begins with the pattern.
    Prefix(&'static [&'static str]),
}

impl MilestonePattern {
    /// Whether `code_set` satisfies this pattern.
    pub fn matches(&self, code_set: &CodeSet) -> bool {
        match self {
            Self::Exact(p) => code_set.matches_exactly(p),
            Self::Prefix(p) => code_set.starts_with(p),
        }
    }
}

/// Lifecycle milestones recovered from the event history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    /// The application was submitted.
    Submitted,
    /// A decision was made on the application.
    Decision,
}

impl Milestone {
    /// Patterns that identify this milestone, any of which may match.
    pub fn patterns(&self) -> &'static [MilestonePattern] {
        match self {
            Self::Submitted => SUBMITTED_PATTERNS,
            Self::Decision => DECISION_PATTERNS,
        }
    }
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Submitted => "submitted",
            Self::Decision => "decision",
        })
    }
}

const SUBMITTED_PATTERNS: &[MilestonePattern] = &[MilestonePattern::Exact(&[
    "APPLICATION",
    "PRE_APPLICATION",
    "SUBMITTED",
])];

const DECISION_PATTERNS: &[MilestonePattern] = &[
    MilestonePattern::Prefix(&["APPLICATION", "DECISION"]),
    MilestonePattern::Prefix(&["APPLICATION", "ISSUANCE"]),
    MilestonePattern::Exact(&["APPLICATION", "ISSUED"]),
];

/// Stage and state read from a code path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageState {
    /// Second code of the path, or the phase when absent.
    pub stage: Code,
    /// Third code of the path, or the stage when absent.
    pub state: Code,
}

/// Derive stage and state from a code path by positional fallback.
///
/// Returns `None` only for an empty path, which a valid feed never sends.
/// Codes past the third are ignored.
pub fn derive_stage_state(code_set: &CodeSet) -> Option<StageState> {
    let codes = code_set.codes();
    let phase = codes.first()?;
    let stage = codes.get(1).unwrap_or(phase);
    let state = codes.get(2).unwrap_or(stage);
    Some(StageState {
        stage: stage.clone(),
        state: state.clone(),
    })
}

/// Position and event of the first process event matching `milestone`.
pub fn find_milestone(
    events: &[ProcessEvent],
    milestone: Milestone,
) -> Option<(usize, &ProcessEvent)> {
    let patterns = milestone.patterns();
    events
        .iter()
        .enumerate()
        .find(|(_, e)| patterns.iter().any(|p| p.matches(e.process.code_set())))
}
