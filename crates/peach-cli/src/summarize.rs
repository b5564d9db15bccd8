//! # Summarize Subcommand
//!
//! Reads a PIES feed document and prints the summary map as JSON:
//!
//! ```bash
//! peach summarize feed.json --pretty
//! curl -s "$PEACH_URL/records" | peach summarize --on-duplicate reject
//! ```
//!
//! With `--diagnostics` every entry is `{ "summary": ..., "warnings": [...] }`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use peach_summary::{
    summarize_batch_with, summarize_batch_with_diagnostics, validate_record, DuplicateKeyPolicy,
    SummaryError,
};

use crate::config::CliConfig;

/// Arguments for the `peach summarize` subcommand.
#[derive(Args, Debug, Default)]
pub struct SummarizeArgs {
    /// Feed document (a record or an array of records). Reads stdin if absent or `-`.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,

    /// Include diagnostic warnings with every summary.
    #[arg(long)]
    pub diagnostics: bool,

    /// How to resolve records sharing `system_id + record_id`.
    #[arg(long, value_name = "last-wins|first-wins|reject")]
    pub on_duplicate: Option<DuplicateKeyPolicy>,

    /// Validate every record first and refuse to summarize a non-conforming feed.
    #[arg(long)]
    pub validate: bool,
}

/// Execute the summarize subcommand, writing JSON to `out`.
///
/// Returns exit code: 0 on success, 1 on validation failure or a rejected
/// duplicate key. Malformed input is returned as an error.
pub fn run_summarize(args: &SummarizeArgs, config: &CliConfig, out: &mut dyn Write) -> Result<u8> {
    let policy = args.on_duplicate.unwrap_or(config.on_duplicate);
    let pretty = args.pretty || config.pretty;
    let diagnostics = args.diagnostics || config.diagnostics;

    let records = crate::read_feed(args.path.as_deref())?;
    tracing::info!(records = records.len(), %policy, "decoded PEACH feed");

    if args.validate {
        let mut failed = 0usize;
        for record in &records {
            for issue in validate_record(record) {
                tracing::error!(record = %record.composite_key(), %issue, "validation failed");
                failed += 1;
            }
        }
        if failed > 0 {
            tracing::error!(issues = failed, "feed failed validation; not summarizing");
            return Ok(1);
        }
    }

    let value = if diagnostics {
        summarize_batch_with_diagnostics(&records, policy).map(serde_json::to_value)
    } else {
        summarize_batch_with(&records, policy).map(serde_json::to_value)
    };

    let value = match value {
        Ok(v) => v.context("failed to serialize summaries")?,
        Err(e @ SummaryError::DuplicateKey { .. }) => {
            tracing::error!("{e}");
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    crate::write_json(out, &value, pretty)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(record_ids: &[&str]) -> String {
        let records: Vec<serde_json::Value> = record_ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "transaction_id": "01890a5d-ac96-774b-bcce-b302099a8057",
                    "version": "0.1.0",
                    "kind": "Record",
                    "system_id": "ITSM_5917",
                    "record_id": id,
                    "record_kind": "Permit",
                    "process_event_set": [{
                        "event": { "start_date": "2024-01-10" },
                        "process": {
                            "code": "SUBMITTED",
                            "code_set": ["APPLICATION", "PRE_APPLICATION", "SUBMITTED"],
                            "code_system": "https://bcgov.github.io/nr-pies/docs/spec/code_system/application_process"
                        }
                    }],
                    "on_hold_event_set": []
                })
            })
            .collect();
        serde_json::Value::Array(records).to_string()
    }

    fn run(doc: &str, mut args: SummarizeArgs, config: &CliConfig) -> (u8, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.json");
        std::fs::write(&path, doc).unwrap();
        args.path = Some(path);
        let mut out = Vec::new();
        let code = run_summarize(&args, config, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn summarizes_feed_file() {
        let (code, out) = run(&feed(&["R1"]), SummarizeArgs::default(), &CliConfig::default());
        assert_eq!(code, 0);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "ITSM_5917R1": {
                    "stage": "PRE_APPLICATION",
                    "state": "SUBMITTED",
                    "statusChangeDate": "2024-01-10T00:00:00Z",
                    "submittedDate": "2024-01-10T00:00:00Z"
                }
            })
        );
    }

    #[test]
    fn diagnostics_wrap_summaries() {
        let args = SummarizeArgs {
            diagnostics: true,
            ..SummarizeArgs::default()
        };
        let (_, out) = run(&feed(&["R1"]), args, &CliConfig::default());
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["ITSM_5917R1"]["summary"]["state"], "SUBMITTED");
        assert_eq!(
            v["ITSM_5917R1"]["warnings"][0]["warning"],
            "milestone_not_found"
        );
    }

    #[test]
    fn reject_policy_from_config() {
        let config = CliConfig {
            on_duplicate: DuplicateKeyPolicy::Reject,
            ..CliConfig::default()
        };
        let (code, out) = run(&feed(&["R1", "R1"]), SummarizeArgs::default(), &config);
        assert_eq!(code, 1);
        assert!(out.is_empty());
    }

    #[test]
    fn flag_overrides_config_policy() {
        let config = CliConfig {
            on_duplicate: DuplicateKeyPolicy::Reject,
            ..CliConfig::default()
        };
        let args = SummarizeArgs {
            on_duplicate: Some(DuplicateKeyPolicy::LastWins),
            ..SummarizeArgs::default()
        };
        let (code, _) = run(&feed(&["R1", "R1"]), args, &config);
        assert_eq!(code, 0);
    }

    #[test]
    fn validate_flag_blocks_bad_feed() {
        let bad = feed(&["R1"]).replace("\"0.1.0\"", "\"one\"");
        let args = SummarizeArgs {
            validate: true,
            ..SummarizeArgs::default()
        };
        let (code, out) = run(&bad, args, &CliConfig::default());
        assert_eq!(code, 1);
        assert!(out.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.json");
        std::fs::write(&path, "[{").unwrap();
        let args = SummarizeArgs {
            path: Some(path),
            ..SummarizeArgs::default()
        };
        let mut out = Vec::new();
        assert!(run_summarize(&args, &CliConfig::default(), &mut out).is_err());
    }
}
