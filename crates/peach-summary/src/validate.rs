//! # Record Validation
//!
//! Checks a decoded [`PeachRecord`] against the PIES invariants that the
//! upstream ingestion layer is expected to guarantee. The summarizer never
//! calls this; it is for callers that want to reject or report
//! non-conforming records before trusting their summaries.
//!
//! Every issue carries a JSON-pointer style path into the record, e.g.
//! `/process_event_set/2/process/code_set/1`.

use serde::{Deserialize, Serialize};

use peach_core::{CodeSet, Coding, Event, PeachRecord, MAX_CODE_SET_LEN};

use crate::normalize::normalize_event;

/// Kind of invariant violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// `process_event_set` has no events.
    EmptyProcessEventSet,
    /// A `code_set` has fewer than 1 or more than 3 codes.
    CodeSetArity,
    /// A code is not an upper-case token.
    MalformedCode,
    /// `system_id` is not an upper-case token.
    MalformedItsmCode,
    /// `transaction_id` is not a UUIDv7.
    MalformedTransactionId,
    /// `version` is not `MAJOR.MINOR.PATCH`.
    MalformedVersion,
    /// A `code_system` is not an absolute URI.
    MalformedCodeSystem,
    /// A date is not `YYYY-MM-DD`.
    MalformedDate,
    /// A datetime is not RFC 3339.
    MalformedDateTime,
    /// An event ends before it starts.
    EndBeforeStart,
}

/// A single invariant violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Location in the record.
    pub path: String,
    /// What is wrong.
    pub kind: IssueKind,
    /// Human-readable detail.
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Collect every invariant violation in `record`. Empty means conforming.
pub fn validate_record(record: &PeachRecord) -> Vec<ValidationIssue> {
    let mut issues = Issues::default();

    if !record.transaction_id.is_well_formed() {
        issues.push(
            "/transaction_id",
            IssueKind::MalformedTransactionId,
            format!("{:?} is not a UUIDv7", record.transaction_id.as_str()),
        );
    }
    if !record.version.is_well_formed() {
        issues.push(
            "/version",
            IssueKind::MalformedVersion,
            format!("{:?} is not MAJOR.MINOR.PATCH", record.version.as_str()),
        );
    }
    if !record.system_id.is_well_formed() {
        issues.push(
            "/system_id",
            IssueKind::MalformedItsmCode,
            format!("{:?} is not an ITSM code", record.system_id.as_str()),
        );
    }
    if record.process_event_set.is_empty() {
        issues.push(
            "/process_event_set",
            IssueKind::EmptyProcessEventSet,
            "record has no process events".to_string(),
        );
    }

    for (i, pe) in record.process_event_set.iter().enumerate() {
        let base = format!("/process_event_set/{i}");
        check_coding(&pe.process.coding, &format!("{base}/process"), &mut issues);
        check_event(&pe.event, &format!("{base}/event"), &mut issues);
    }
    for (i, ce) in record.on_hold_event_set.iter().enumerate() {
        let base = format!("/on_hold_event_set/{i}");
        check_coding(&ce.coding, &format!("{base}/coding"), &mut issues);
        check_event(&ce.event, &format!("{base}/event"), &mut issues);
    }

    if !issues.0.is_empty() {
        tracing::debug!(
            record = %record.composite_key(),
            issues = issues.0.len(),
            "PEACH record failed validation"
        );
    }
    issues.0
}

#[derive(Default)]
struct Issues(Vec<ValidationIssue>);

impl Issues {
    fn push(&mut self, path: impl Into<String>, kind: IssueKind, message: String) {
        self.0.push(ValidationIssue {
            path: path.into(),
            kind,
            message,
        });
    }
}

fn check_coding(coding: &Coding, base: &str, issues: &mut Issues) {
    if !coding.code.is_well_formed() {
        issues.push(
            format!("{base}/code"),
            IssueKind::MalformedCode,
            format!("{:?} is not a PIES code", coding.code.as_str()),
        );
    }
    check_code_set(&coding.code_set, &format!("{base}/code_set"), issues);
    if let Err(e) = coding.code_system_uri() {
        issues.push(
            format!("{base}/code_system"),
            IssueKind::MalformedCodeSystem,
            e.to_string(),
        );
    }
}

fn check_code_set(code_set: &CodeSet, path: &str, issues: &mut Issues) {
    if !code_set.has_valid_arity() {
        issues.push(
            path,
            IssueKind::CodeSetArity,
            format!(
                "code_set has {} codes, expected 1 to {MAX_CODE_SET_LEN}",
                code_set.len()
            ),
        );
    }
    for (i, code) in code_set.into_iter().enumerate() {
        if !code.is_well_formed() {
            issues.push(
                format!("{path}/{i}"),
                IssueKind::MalformedCode,
                format!("{:?} is not a PIES code", code.as_str()),
            );
        }
    }
}

fn check_event(event: &Event, base: &str, issues: &mut Issues) {
    let end = match event {
        Event::Date {
            start_date,
            end_date,
        } => {
            for (field, value) in [("start_date", Some(start_date)), ("end_date", end_date.as_ref())] {
                if let Some(v) = value.filter(|v| !v.is_well_formed()) {
                    issues.push(
                        format!("{base}/{field}"),
                        IssueKind::MalformedDate,
                        format!("{:?} is not YYYY-MM-DD", v.as_str()),
                    );
                }
            }
            end_date.as_ref().and_then(|d| d.to_instant())
        }
        Event::DateTime {
            start_datetime,
            end_datetime,
        } => {
            for (field, value) in [
                ("start_datetime", Some(start_datetime)),
                ("end_datetime", end_datetime.as_ref()),
            ] {
                if let Some(v) = value.filter(|v| !v.is_well_formed()) {
                    issues.push(
                        format!("{base}/{field}"),
                        IssueKind::MalformedDateTime,
                        format!("{:?} is not an RFC 3339 datetime", v.as_str()),
                    );
                }
            }
            end_datetime.as_ref().and_then(|d| d.to_instant())
        }
    };

    if let (Some(start), Some(end)) = (normalize_event(event), end) {
        if end < start {
            issues.push(
                base,
                IssueKind::EndBeforeStart,
                format!("event ends at {end} before it starts at {start}"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json() -> serde_json::Value {
        serde_json::json!({
            "transaction_id": "01890a5d-ac96-774b-bcce-b302099a8057",
            "version": "0.1.0",
            "kind": "Record",
            "system_id": "ITSM_5917",
            "record_id": "R1",
            "record_kind": "Permit",
            "process_event_set": [{
                "event": { "start_date": "2024-01-10", "end_date": "2024-01-12" },
                "process": {
                    "code": "SUBMITTED",
                    "code_set": ["APPLICATION", "PRE_APPLICATION", "SUBMITTED"],
                    "code_system": "https://bcgov.github.io/nr-pies/docs/spec/code_system/application_process"
                }
            }],
            "on_hold_event_set": [{
                "event": { "start_datetime": "2024-01-11T00:00:00Z" },
                "coding": {
                    "code": "ON_HOLD",
                    "code_set": ["ON_HOLD"],
                    "code_system": "https://bcgov.github.io/nr-pies/docs/spec/code_system/on_hold_process"
                }
            }]
        })
    }

    fn issues_for(v: serde_json::Value) -> Vec<ValidationIssue> {
        validate_record(&serde_json::from_value(v).unwrap())
    }

    fn kinds(issues: &[ValidationIssue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_conforming_record_has_no_issues() {
        assert_eq!(issues_for(record_json()), vec![]);
    }

    #[test]
    fn test_empty_process_event_set() {
        let mut v = record_json();
        v["process_event_set"] = serde_json::json!([]);
        let issues = issues_for(v);
        assert_eq!(kinds(&issues), vec![IssueKind::EmptyProcessEventSet]);
        assert_eq!(issues[0].path, "/process_event_set");
    }

    #[test]
    fn test_code_set_arity_and_bad_code() {
        let mut v = record_json();
        v["process_event_set"][0]["process"]["code_set"] =
            serde_json::json!(["APPLICATION", "pre", "SUBMITTED", "EXTRA"]);
        let issues = issues_for(v);
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::CodeSetArity, IssueKind::MalformedCode]
        );
        assert_eq!(issues[1].path, "/process_event_set/0/process/code_set/1");
    }

    #[test]
    fn test_header_fields() {
        let mut v = record_json();
        v["transaction_id"] = serde_json::json!("3b241101-e2bb-4255-8caf-4136c566a962");
        v["version"] = serde_json::json!("1.0");
        v["system_id"] = serde_json::json!("itsm");
        assert_eq!(
            kinds(&issues_for(v)),
            vec![
                IssueKind::MalformedTransactionId,
                IssueKind::MalformedVersion,
                IssueKind::MalformedItsmCode
            ]
        );
    }

    #[test]
    fn test_code_system_must_be_absolute_uri() {
        let mut v = record_json();
        v["on_hold_event_set"][0]["coding"]["code_system"] = serde_json::json!("on_hold_process");
        let issues = issues_for(v);
        assert_eq!(kinds(&issues), vec![IssueKind::MalformedCodeSystem]);
        assert_eq!(issues[0].path, "/on_hold_event_set/0/coding/code_system");
    }

    #[test]
    fn test_malformed_dates() {
        let mut v = record_json();
        v["process_event_set"][0]["event"] =
            serde_json::json!({ "start_date": "10/01/2024", "end_date": "2024-01-12" });
        v["on_hold_event_set"][0]["event"] = serde_json::json!({ "start_datetime": "2024-01-11" });
        let issues = issues_for(v);
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::MalformedDate, IssueKind::MalformedDateTime]
        );
        assert_eq!(issues[0].path, "/process_event_set/0/event/start_date");
        assert_eq!(issues[1].path, "/on_hold_event_set/0/event/start_datetime");
    }

    #[test]
    fn test_unpadded_and_signed_dates_are_malformed() {
        let mut v = record_json();
        v["process_event_set"][0]["event"] =
            serde_json::json!({ "start_date": "2024-1-10", "end_date": "+2024-01-12" });
        let issues = issues_for(v);
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::MalformedDate, IssueKind::MalformedDate]
        );
        assert_eq!(issues[0].path, "/process_event_set/0/event/start_date");
        assert_eq!(issues[1].path, "/process_event_set/0/event/end_date");
    }

    #[test]
    fn test_end_before_start() {
        let mut v = record_json();
        v["process_event_set"][0]["event"] =
            serde_json::json!({ "start_date": "2024-01-10", "end_date": "2024-01-09" });
        let issues = issues_for(v);
        assert_eq!(kinds(&issues), vec![IssueKind::EndBeforeStart]);
        assert_eq!(issues[0].path, "/process_event_set/0/event");
    }

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue {
            path: "/version".into(),
            kind: IssueKind::MalformedVersion,
            message: "bad".into(),
        };
        assert_eq!(issue.to_string(), "/version: bad");
    }
}
