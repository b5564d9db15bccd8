//! # peach-cli — Command-Line Front End for the PEACH Interpreter
//!
//! Provides the `peach` binary, which reads PIES feed documents from a file
//! or stdin and runs them through `peach-summary`.
//!
//! ## Subcommands
//!
//! - `peach summarize` — Summary map keyed by `system_id + record_id`.
//! - `peach validate` — Schema invariant report per record.
//!
//! ```bash
//! peach summarize feed.json --pretty
//! peach -v summarize --on-duplicate reject < feed.json
//! peach validate feed.json
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers; handlers write to a
//!   caller-supplied `Write` so they can be tested without a terminal.
//! - No interpretation logic here; everything delegates to `peach-summary`.

pub mod config;
pub mod summarize;
pub mod validate;

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use peach_core::PeachRecord;

/// Read and decode a feed document from `path`, or stdin for `None`/`-`.
pub fn read_feed(path: Option<&Path>) -> Result<Vec<PeachRecord>> {
    let (text, source) = match path {
        Some(p) if p != Path::new("-") => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read {}", p.display()))?;
            (text, p.display().to_string())
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            (text, "<stdin>".to_string())
        }
    };
    tracing::debug!(source = %source, bytes = text.len(), "read feed document");
    peach_summary::parse_records(&text).with_context(|| format!("failed to decode {source}"))
}

/// Write `value` as JSON followed by a newline.
pub fn write_json(out: &mut dyn Write, value: &serde_json::Value, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_feed_reports_path_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = read_feed(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }

    #[test]
    fn write_json_compact_and_pretty() {
        let value = serde_json::json!({ "a": 1 });
        let mut compact = Vec::new();
        write_json(&mut compact, &value, false).unwrap();
        assert_eq!(compact, b"{\"a\":1}\n");

        let mut pretty = Vec::new();
        write_json(&mut pretty, &value, true).unwrap();
        assert_eq!(String::from_utf8(pretty).unwrap(), "{\n  \"a\": 1\n}\n");
    }
}
