//! # Codings — Hierarchical Status Code Paths
//!
//! A PIES [`Coding`] classifies an event with a code path of one to three
//! codes, read as `phase → stage → state`:
//!
//! ```text
//! [APPLICATION]                                   phase only
//! [APPLICATION, PRE_APPLICATION]                  phase + stage
//! [APPLICATION, PRE_APPLICATION, SUBMITTED]       phase + stage + state
//! ```
//!
//! [`Process`] is a coding that describes a lifecycle transition and adds
//! free-text status fields.

use serde::{Deserialize, Serialize};

use crate::error::PiesError;
use crate::identity::Code;

/// Maximum number of codes in a code path.
pub const MAX_CODE_SET_LEN: usize = 3;

/// An ordered code path of 1 to 3 codes.
///
/// The wire form is a plain JSON array and is not length-checked on
/// decode; accessors tolerate any length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeSet(Vec<Code>);

impl CodeSet {
    /// Construct a code path, checking its arity.
    ///
    /// # Errors
    ///
    /// Returns [`PiesError::InvalidCodeSet`] if `codes` is empty or longer
    /// than [`MAX_CODE_SET_LEN`].
    pub fn new(codes: Vec<Code>) -> Result<Self, PiesError> {
        if codes.is_empty() || codes.len() > MAX_CODE_SET_LEN {
            return Err(PiesError::InvalidCodeSet { len: codes.len() });
        }
        Ok(Self(codes))
    }

    /// Construct from string tokens, validating each code and the arity.
    ///
    /// # Errors
    ///
    /// Returns the first code or arity error encountered.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, PiesError> {
        let codes = tokens
            .iter()
            .map(|t| Code::new(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(codes)
    }

    /// The codes in path order.
    pub fn codes(&self) -> &[Code] {
        &self.0
    }

    /// Number of codes in the path.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path is empty (only possible for unvalidated input).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the arity is within 1..=3.
    pub fn has_valid_arity(&self) -> bool {
        (1..=MAX_CODE_SET_LEN).contains(&self.0.len())
    }

    /// The codes equal `pattern` element for element, with the same length.
    pub fn matches_exactly(&self, pattern: &[&str]) -> bool {
        self.0.len() == pattern.len() && self.starts_with(pattern)
    }

    /// The first `pattern.len()` codes equal `pattern`.
    pub fn starts_with(&self, pattern: &[&str]) -> bool {
        self.0.len() >= pattern.len()
            && self.0.iter().zip(pattern).all(|(code, p)| code == p)
    }
}

impl<'a> IntoIterator for &'a CodeSet {
    type Item = &'a Code;
    type IntoIter = std::slice::Iter<'a, Code>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for CodeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, code) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(code.as_str())?;
        }
        f.write_str("]")
    }
}

/// A coded classification with its code path and code system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    /// The leaf code.
    pub code: Code,
    /// Human-readable label for `code`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_display: Option<String>,
    /// Ordered code path, phase first.
    pub code_set: CodeSet,
    /// URI identifying the code system.
    pub code_system: String,
}

impl Coding {
    /// Parse `code_system` as an absolute URI.
    ///
    /// # Errors
    ///
    /// Returns [`PiesError::InvalidUri`] if the value is not an absolute URI.
    pub fn code_system_uri(&self) -> Result<url::Url, PiesError> {
        url::Url::parse(&self.code_system).map_err(|e| PiesError::InvalidUri {
            value: self.code_system.clone(),
            reason: e.to_string(),
        })
    }
}

/// A coding that classifies a lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// The process classification.
    #[serde(flatten)]
    pub coding: Coding,
    /// Free-text status reported by the source system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Source-system status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    /// Source-system status description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,
}

impl Process {
    /// The process code path.
    pub fn code_set(&self) -> &CodeSet {
        &self.coding.code_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> CodeSet {
        CodeSet::parse(tokens).unwrap()
    }

    #[test]
    fn test_arity_bounds() {
        assert_eq!(
            CodeSet::new(vec![]),
            Err(PiesError::InvalidCodeSet { len: 0 })
        );
        assert!(CodeSet::parse(&["A", "B", "C", "D"]).is_err());
        assert_eq!(set(&["A", "B", "C"]).len(), 3);
    }

    #[test]
    fn test_parse_rejects_bad_code() {
        assert!(matches!(
            CodeSet::parse(&["APPLICATION", "pre"]),
            Err(PiesError::InvalidCode(_))
        ));
    }

    #[test]
    fn test_exact_match_requires_same_length() {
        let s = set(&["APPLICATION", "ISSUED"]);
        assert!(s.matches_exactly(&["APPLICATION", "ISSUED"]));
        assert!(!s.matches_exactly(&["APPLICATION"]));
        assert!(!s.matches_exactly(&["APPLICATION", "ISSUED", "FINAL"]));
    }

    #[test]
    fn test_prefix_match() {
        let s = set(&["APPLICATION", "DECISION", "FINAL"]);
        assert!(s.starts_with(&["APPLICATION", "DECISION"]));
        assert!(s.starts_with(&["APPLICATION"]));
        assert!(!s.starts_with(&["APPLICATION", "ISSUANCE"]));
        assert!(!set(&["APPLICATION"]).starts_with(&["APPLICATION", "DECISION"]));
    }

    #[test]
    fn test_decoded_overlong_set_is_tolerated() {
        let s: CodeSet = serde_json::from_str(r#"["A","B","C","D"]"#).unwrap();
        assert_eq!(s.len(), 4);
        assert!(!s.has_valid_arity());
    }

    #[test]
    fn test_display() {
        assert_eq!(set(&["A", "B"]).to_string(), "[A, B]");
    }

    #[test]
    fn test_process_flattens_coding() {
        let json = r#"{
            "code": "SUBMITTED",
            "code_set": ["APPLICATION", "PRE_APPLICATION", "SUBMITTED"],
            "code_system": "https://bcgov.github.io/nr-pies/docs/spec/code_system/application_process",
            "status": "Submitted"
        }"#;
        let p: Process = serde_json::from_str(json).unwrap();
        assert_eq!(p.coding.code.as_str(), "SUBMITTED");
        assert_eq!(p.code_set().len(), 3);
        assert_eq!(p.status.as_deref(), Some("Submitted"));
        assert_eq!(p.status_code, None);
    }
}
