//! # PIES Branded Primitives
//!
//! Newtype wrappers for the opaque string tokens of the PIES data model.
//! These prevent accidental identifier confusion — you cannot pass a
//! display string where a [`Code`] is expected, or a record identifier
//! where an [`ItsmCode`] is expected.
//!
//! ## Wire Form
//!
//! Every type here is `#[serde(transparent)]` and deserializes without
//! validation. PEACH feeds are validated upstream of the interpreter, so
//! decoding passes values through as supplied. Call `new()` to construct a
//! checked value, or `is_well_formed()` (used by the record validator) to
//! test a decoded one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PiesError;

/// Returns `true` if `s` matches `^[A-Z][A-Z0-9]*(_[A-Z0-9]+)*$`.
pub fn is_code_token(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_uppercase())
        && s.split('_').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        })
}

// ─── Code ────────────────────────────────────────────────────────────

/// A PIES status code such as `APPLICATION` or `PRE_APPLICATION`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    /// Construct a code, validating the token pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PiesError::InvalidCode`] if `s` is not an upper-case token.
    pub fn new(s: impl Into<String>) -> Result<Self, PiesError> {
        let s = s.into();
        if !is_code_token(&s) {
            return Err(PiesError::InvalidCode(s));
        }
        Ok(Self(s))
    }

    /// Whether the wrapped token matches the code pattern.
    pub fn is_well_formed(&self) -> bool {
        is_code_token(&self.0)
    }

    /// Access the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Code {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Code {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── ITSM Code ───────────────────────────────────────────────────────

/// Code of the PEACH source system (ITSM) that owns a record.
///
/// Together with the record identifier it forms the composite record key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItsmCode(String);

impl ItsmCode {
    /// Construct an ITSM code, validating the token pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PiesError::InvalidItsmCode`] if `s` is not an upper-case token.
    pub fn new(s: impl Into<String>) -> Result<Self, PiesError> {
        let s = s.into();
        if !is_code_token(&s) {
            return Err(PiesError::InvalidItsmCode(s));
        }
        Ok(Self(s))
    }

    /// Whether the wrapped token matches the code pattern.
    pub fn is_well_formed(&self) -> bool {
        is_code_token(&self.0)
    }

    /// Access the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItsmCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── UUIDv7 ──────────────────────────────────────────────────────────

/// Transaction identifier of a PIES message. Must be a version 7 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UuidV7(String);

impl UuidV7 {
    /// Construct a transaction identifier, checking the UUID version.
    ///
    /// # Errors
    ///
    /// Returns [`PiesError::InvalidUuidV7`] if `s` is not a UUID or its
    /// version nibble is not 7.
    pub fn new(s: impl Into<String>) -> Result<Self, PiesError> {
        let s = s.into();
        check_uuid_v7(&s)?;
        Ok(Self(s))
    }

    /// Whether the wrapped value is a version 7 UUID.
    pub fn is_well_formed(&self) -> bool {
        check_uuid_v7(&self.0).is_ok()
    }

    /// Access the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_uuid_v7(s: &str) -> Result<(), PiesError> {
    let uuid = Uuid::parse_str(s).map_err(|e| PiesError::InvalidUuidV7 {
        value: s.to_string(),
        reason: e.to_string(),
    })?;
    match uuid.get_version_num() {
        7 => Ok(()),
        other => Err(PiesError::InvalidUuidV7 {
            value: s.to_string(),
            reason: format!("version {other}, expected 7"),
        }),
    }
}

impl std::fmt::Display for UuidV7 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Version ─────────────────────────────────────────────────────────

/// PIES message schema version, `MAJOR.MINOR.PATCH`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Construct a version, checking the dotted numeric form.
    ///
    /// # Errors
    ///
    /// Returns [`PiesError::InvalidVersion`] unless `s` has exactly three
    /// non-empty, all-digit components.
    pub fn new(s: impl Into<String>) -> Result<Self, PiesError> {
        let s = s.into();
        if !is_semver(&s) {
            return Err(PiesError::InvalidVersion(s));
        }
        Ok(Self(s))
    }

    /// Whether the wrapped value is `MAJOR.MINOR.PATCH`.
    pub fn is_well_formed(&self) -> bool {
        is_semver(&self.0)
    }

    /// Access the raw string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_semver(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
