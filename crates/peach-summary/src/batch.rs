//! # Batch Summarizer
//!
//! Summarizes a sequence of records into a lookup table keyed by
//! `system_id + record_id` (concatenated, no delimiter).
//!
//! Each summary depends only on its own record. The only interaction
//! between records is a shared composite key, resolved by
//! [`DuplicateKeyPolicy`]. The default keeps the last record in input
//! order and logs a warning for every overwrite.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use peach_core::PeachRecord;

use crate::error::SummaryError;
use crate::summary::{summarize, summarize_with_diagnostics, PeachSummary, SummaryReport};

/// Summaries keyed by composite record key.
pub type SummaryMap = BTreeMap<String, PeachSummary>;

/// Diagnostic reports keyed by composite record key.
pub type ReportMap = BTreeMap<String, SummaryReport>;

/// What to do when two records share a composite key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
    /// The later record replaces the earlier one.
    #[default]
    LastWins,
    /// The earlier record is kept; later ones are ignored.
    FirstWins,
    /// Fail with [`SummaryError::DuplicateKey`].
    Reject,
}

impl std::fmt::Display for DuplicateKeyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::LastWins => "last-wins",
            Self::FirstWins => "first-wins",
            Self::Reject => "reject",
        })
    }
}

impl std::str::FromStr for DuplicateKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-wins" | "last_wins" => Ok(Self::LastWins),
            "first-wins" | "first_wins" => Ok(Self::FirstWins),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown duplicate key policy {other:?}; expected last-wins, first-wins, or reject"
            )),
        }
    }
}

/// Summarize a batch, later records overwriting earlier ones on key clash.
pub fn summarize_batch<'a, I>(records: I) -> SummaryMap
where
    I: IntoIterator<Item = &'a PeachRecord>,
{
    let last_wins = |key: &str, first_index: usize, duplicate_index: usize| {
        Ok::<_, Infallible>(resolve_duplicate(
            DuplicateKeyPolicy::LastWins,
            key,
            first_index,
            duplicate_index,
        ))
    };
    match collect_by_key(records, summarize, last_wins) {
        Ok(map) => map,
        Err(never) => match never {},
    }
}

/// Summarize a batch with an explicit duplicate key policy.
///
/// # Errors
///
/// Returns [`SummaryError::DuplicateKey`] under [`DuplicateKeyPolicy::Reject`]
/// when two records share a composite key.
pub fn summarize_batch_with<'a, I>(
    records: I,
    policy: DuplicateKeyPolicy,
) -> Result<SummaryMap, SummaryError>
where
    I: IntoIterator<Item = &'a PeachRecord>,
{
    collect_by_key(records, summarize, policy_resolver(policy))
}

/// Summarize a batch with diagnostics for every record.
///
/// # Errors
///
/// Same as [`summarize_batch_with()`].
pub fn summarize_batch_with_diagnostics<'a, I>(
    records: I,
    policy: DuplicateKeyPolicy,
) -> Result<ReportMap, SummaryError>
where
    I: IntoIterator<Item = &'a PeachRecord>,
{
    collect_by_key(records, summarize_with_diagnostics, policy_resolver(policy))
}

/// Which record keeps a contested key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keep {
    Earlier,
    Later,
}

fn policy_resolver(
    policy: DuplicateKeyPolicy,
) -> impl Fn(&str, usize, usize) -> Result<Keep, SummaryError> {
    move |key: &str, first_index: usize, duplicate_index: usize| match policy {
        DuplicateKeyPolicy::Reject => Err(SummaryError::DuplicateKey {
            key: key.to_string(),
            first_index,
            duplicate_index,
        }),
        _ => Ok(resolve_duplicate(policy, key, first_index, duplicate_index)),
    }
}

fn resolve_duplicate(
    policy: DuplicateKeyPolicy,
    key: &str,
    first_index: usize,
    duplicate_index: usize,
) -> Keep {
    if policy == DuplicateKeyPolicy::FirstWins {
        tracing::warn!(
            key = %key,
            first_index,
            duplicate_index,
            "duplicate PEACH record key; later record ignored"
        );
        Keep::Earlier
    } else {
        tracing::warn!(
            key = %key,
            first_index,
            duplicate_index,
            "duplicate PEACH record key; later record wins"
        );
        Keep::Later
    }
}

fn collect_by_key<'a, I, T, E, F, R>(
    records: I,
    summarize_one: F,
    on_duplicate: R,
) -> Result<BTreeMap<String, T>, E>
where
    I: IntoIterator<Item = &'a PeachRecord>,
    F: Fn(&PeachRecord) -> T,
    R: Fn(&str, usize, usize) -> Result<Keep, E>,
{
    // (position of the record currently held, summary)
    let mut slots: BTreeMap<String, (usize, T)> = BTreeMap::new();
    for (index, record) in records.into_iter().enumerate() {
        match slots.entry(record.composite_key()) {
            Entry::Vacant(slot) => {
                slot.insert((index, summarize_one(record)));
            }
            Entry::Occupied(mut slot) => {
                let first_index = slot.get().0;
                if on_duplicate(slot.key(), first_index, index)? == Keep::Later {
                    slot.insert((index, summarize_one(record)));
                }
            }
        }
    }
    Ok(slots.into_iter().map(|(k, (_, v))| (k, v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(system_id: &str, record_id: &str, code_set: &[&str], date: &str) -> PeachRecord {
        let json = serde_json::json!({
            "transaction_id": "01890a5d-ac96-774b-bcce-b302099a8057",
            "version": "0.1.0",
            "kind": "Record",
            "system_id": system_id,
            "record_id": record_id,
            "record_kind": "Permit",
            "process_event_set": [{
                "event": { "start_date": date },
                "process": {
                    "code": code_set[code_set.len() - 1],
                    "code_set": code_set,
                    "code_system": "https://bcgov.github.io/nr-pies/docs/spec/code_system/application_process"
                }
            }],
            "on_hold_event_set": []
        });
        serde_json::from_value(json).unwrap()
    }

    fn state_of(map: &SummaryMap, key: &str) -> String {
        map[key].state.as_ref().unwrap().to_string()
    }

    #[test]
    fn test_keys_are_concatenated() {
        let records = [
            record("ITSM_1", "A", &["APPLICATION"], "2024-01-01"),
            record("ITSM_2", "B", &["APPLICATION", "INTAKE"], "2024-01-01"),
        ];
        let map = summarize_batch(&records);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["ITSM_1A", "ITSM_2B"]);
        assert_eq!(state_of(&map, "ITSM_2B"), "INTAKE");
    }

    #[test]
    fn test_duplicate_last_wins_by_default() {
        let records = [
            record("ITSM_1", "A", &["APPLICATION", "INTAKE"], "2024-01-01"),
            record("ITSM_1", "A", &["APPLICATION", "TECH_REVIEW"], "2023-01-01"),
        ];
        let map = summarize_batch(&records);
        assert_eq!(map.len(), 1);
        assert_eq!(state_of(&map, "ITSM_1A"), "TECH_REVIEW");
        assert_eq!(
            summarize_batch_with(&records, DuplicateKeyPolicy::LastWins).unwrap(),
            map
        );
    }

    #[test]
    fn test_default_batch_agrees_with_last_wins_policy() {
        let records = [
            record("ITSM_1", "A", &["APPLICATION", "INTAKE"], "2024-01-01"),
            record("ITSM_2", "B", &["APPLICATION"], "2024-01-01"),
            record("ITSM_1", "A", &["APPLICATION", "TECH_REVIEW"], "2024-01-01"),
            record("ITSM_1", "A", &["APPLICATION", "DECISION"], "2022-01-01"),
        ];
        let map = summarize_batch(&records);
        assert_eq!(map.len(), 2);
        assert_eq!(state_of(&map, "ITSM_1A"), "DECISION");
        assert_eq!(
            summarize_batch_with(&records, DuplicateKeyPolicy::LastWins).unwrap(),
            map
        );
        let reports =
            summarize_batch_with_diagnostics(&records, DuplicateKeyPolicy::LastWins).unwrap();
        assert_eq!(reports["ITSM_1A"].summary, map["ITSM_1A"]);
    }

    #[test]
    fn test_diagnostics_batch_rejects_duplicates() {
        let records = [
            record("ITSM_1", "A", &["APPLICATION"], "2024-01-01"),
            record("ITSM_1", "A", &["APPLICATION"], "2024-01-01"),
        ];
        assert!(matches!(
            summarize_batch_with_diagnostics(&records, DuplicateKeyPolicy::Reject),
            Err(SummaryError::DuplicateKey { first_index: 0, duplicate_index: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_first_wins() {
        let records = [
            record("ITSM_1", "A", &["APPLICATION", "INTAKE"], "2024-01-01"),
            record("ITSM_1", "A", &["APPLICATION", "TECH_REVIEW"], "2024-01-01"),
        ];
        let map = summarize_batch_with(&records, DuplicateKeyPolicy::FirstWins).unwrap();
        assert_eq!(state_of(&map, "ITSM_1A"), "INTAKE");
    }

    #[test]
    fn test_duplicate_rejected() {
        let records = [
            record("ITSM_1", "A", &["APPLICATION"], "2024-01-01"),
            record("ITSM_2", "B", &["APPLICATION"], "2024-01-01"),
            record("ITSM_1", "A", &["APPLICATION"], "2024-01-01"),
        ];
        let err = summarize_batch_with(&records, DuplicateKeyPolicy::Reject).unwrap_err();
        match err {
            SummaryError::DuplicateKey {
                key,
                first_index,
                duplicate_index,
            } => {
                assert_eq!(key, "ITSM_1A");
                assert_eq!((first_index, duplicate_index), (0, 2));
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[test]
    fn test_concatenation_can_collide() {
        // No delimiter: ("ITSM_1", "2A") and ("ITSM_12", "A") share a key.
        let records = [
            record("ITSM_1", "2A", &["APPLICATION"], "2024-01-01"),
            record("ITSM_12", "A", &["APPLICATION", "INTAKE"], "2024-01-01"),
        ];
        let map = summarize_batch(&records);
        assert_eq!(map.len(), 1);
        assert_eq!(state_of(&map, "ITSM_12A"), "INTAKE");
    }

    #[test]
    fn test_diagnostics_batch() {
        let records = [record("ITSM_1", "A", &["APPLICATION"], "not-a-date")];
        let reports =
            summarize_batch_with_diagnostics(&records, DuplicateKeyPolicy::default()).unwrap();
        let report = &reports["ITSM_1A"];
        assert_eq!(report.summary, summarize(&records[0]));
        assert!(!report.warnings.is_empty());
    }

    #[test]
    fn test_empty_batch() {
        let records: Vec<PeachRecord> = Vec::new();
        assert!(summarize_batch(&records).is_empty());
    }

    #[test]
    fn test_policy_parse_and_display() {
        for policy in [
            DuplicateKeyPolicy::LastWins,
            DuplicateKeyPolicy::FirstWins,
            DuplicateKeyPolicy::Reject,
        ] {
            assert_eq!(policy.to_string().parse::<DuplicateKeyPolicy>(), Ok(policy));
        }
        assert_eq!(
            "LAST_WINS".parse::<DuplicateKeyPolicy>(),
            Ok(DuplicateKeyPolicy::LastWins)
        );
        assert!("newest".parse::<DuplicateKeyPolicy>().is_err());
    }
}
