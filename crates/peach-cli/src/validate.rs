//! # Validate Subcommand
//!
//! Checks every record of a PIES feed against the schema invariants and
//! prints a report. Exit code 1 if any record has an issue.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use peach_summary::validate_record;

/// Arguments for the `peach validate` subcommand.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Feed document (a record or an array of records). Reads stdin if absent or `-`.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Execute the validate subcommand, writing the report to `out`.
///
/// Returns exit code: 0 if every record conforms, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let records = crate::read_feed(args.path.as_deref())?;

    let mut failed = 0usize;
    for (index, record) in records.iter().enumerate() {
        let issues = validate_record(record);
        if issues.is_empty() {
            continue;
        }
        failed += 1;
        writeln!(out, "FAIL: record {index} ({})", record.composite_key())?;
        for issue in &issues {
            writeln!(out, "  {issue}")?;
        }
    }

    writeln!(out, "Records: {}/{} passed", records.len() - failed, records.len())?;
    Ok(u8::from(failed > 0))
}
