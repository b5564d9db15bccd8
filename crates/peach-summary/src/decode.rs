//! # PIES Document Decoding
//!
//! The fatal-error boundary of the interpreter. A document that is not
//! JSON, or whose records lack the PIES record shape, fails here with a
//! [`SummaryError`] instead of being summarized. Within a well-shaped
//! record, unparseable dates and malformed codes pass through untouched.
//!
//! A feed document is either a single record object or an array of them.

use serde_json::Value;

use peach_core::PeachRecord;

use crate::error::SummaryError;

/// Decode a single record from JSON text.
///
/// # Errors
///
/// Returns [`SummaryError::Json`] if the text is not JSON or not a record.
pub fn parse_record(json: &str) -> Result<PeachRecord, SummaryError> {
    Ok(serde_json::from_str(json)?)
}

/// Decode a single record from a JSON value.
///
/// # Errors
///
/// Returns [`SummaryError::Json`] if the value is not a record.
pub fn record_from_value(value: Value) -> Result<PeachRecord, SummaryError> {
    Ok(serde_json::from_value(value)?)
}

/// Decode a feed document: a record object or an array of records.
///
/// # Errors
///
/// Returns [`SummaryError::Json`] for invalid JSON,
/// [`SummaryError::UnexpectedDocument`] for other top-level values, and
/// [`SummaryError::Record`] naming the first record that fails to decode.
pub fn parse_records(json: &str) -> Result<Vec<PeachRecord>, SummaryError> {
    let value: Value = serde_json::from_str(json)?;
    records_from_value(value)
}

/// Decode a feed document from a JSON value.
///
/// # Errors
///
/// Same as [`parse_records()`], minus the JSON syntax case.
pub fn records_from_value(value: Value) -> Result<Vec<PeachRecord>, SummaryError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|source| SummaryError::Record { index, source })
            })
            .collect(),
        Value::Object(_) => Ok(vec![record_from_value(value)?]),
        other => Err(SummaryError::UnexpectedDocument {
            found: json_type_name(&other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
