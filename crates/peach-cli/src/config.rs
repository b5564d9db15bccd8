//! CLI configuration.
//!
//! Settings resolve in layers, each overriding the one before:
//!
//! 1. Built-in defaults.
//! 2. A YAML file given with `--config`.
//! 3. Environment variables.
//! 4. Command-line flags (applied by the subcommand handlers).
//!
//! ```yaml
//! on_duplicate: reject
//! pretty: true
//! diagnostics: false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use peach_summary::DuplicateKeyPolicy;

/// Environment variable overriding [`CliConfig::on_duplicate`].
pub const ENV_ON_DUPLICATE: &str = "PEACH_ON_DUPLICATE";
/// Environment variable overriding [`CliConfig::pretty`].
pub const ENV_PRETTY: &str = "PEACH_PRETTY";
/// Environment variable overriding [`CliConfig::diagnostics`].
pub const ENV_DIAGNOSTICS: &str = "PEACH_DIAGNOSTICS";

/// Resolved CLI settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Resolution of records sharing a composite key.
    pub on_duplicate: DuplicateKeyPolicy,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Emit summaries with their diagnostic warnings.
    pub diagnostics: bool,
}

impl CliConfig {
    /// Load defaults, then the optional file, then the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or an
    /// environment override has an invalid value.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.with_env(|var| std::env::var(var).ok())
    }

    /// Parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parse YAML config text. An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_ON_DUPLICATE) {
            self.on_duplicate = raw.parse().map_err(|reason| ConfigError::InvalidEnv {
                var: ENV_ON_DUPLICATE,
                value: raw.clone(),
                reason,
            })?;
        }
        if let Some(raw) = lookup(ENV_PRETTY) {
            self.pretty = parse_flag(ENV_PRETTY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DIAGNOSTICS) {
            self.diagnostics = parse_flag(ENV_DIAGNOSTICS, &raw)?;
        }
        Ok(self)
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid YAML for [`CliConfig`].
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// An environment override has a value that does not parse.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
