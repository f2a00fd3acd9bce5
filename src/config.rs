//! Configuration sources and the control-type policy selector.
//!
//! The checker takes its configuration as an explicit raw value (a JSON
//! mapping); nothing is read from ambient application state. Helpers here
//! parse that value out of JSON text, TOML text, or a TOML file.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ConfigError;

/// Policy mode governing which rule lists gate registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlType {
    /// No checking; every username is admissible.
    Disabled,

    /// Only usernames matched by the `allowed` list are admissible.
    Allowed,

    /// Every username is admissible except those matched by `prohibited`.
    Prohibited,

    /// A username must match `allowed` and must not match `prohibited`.
    AllowedAndProhibited,
}

impl ControlType {
    /// Spelling used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlType::Disabled => "disabled",
            ControlType::Allowed => "allowed",
            ControlType::Prohibited => "prohibited",
            ControlType::AllowedAndProhibited => "allowed_and_prohibited",
        }
    }

    /// Parse the configuration spelling; exact match only.
    pub fn from_config_value(s: &str) -> Option<Self> {
        match s {
            "disabled" => Some(ControlType::Disabled),
            "allowed" => Some(ControlType::Allowed),
            "prohibited" => Some(ControlType::Prohibited),
            "allowed_and_prohibited" => Some(ControlType::AllowedAndProhibited),
            _ => None,
        }
    }

    /// Whether this mode requires and consults the `allowed` list.
    pub(crate) fn requires_allowed(&self) -> bool {
        matches!(self, ControlType::Allowed | ControlType::AllowedAndProhibited)
    }

    /// Whether this mode requires and consults the `prohibited` list.
    pub(crate) fn requires_prohibited(&self) -> bool {
        matches!(
            self,
            ControlType::Prohibited | ControlType::AllowedAndProhibited
        )
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse JSON text into a raw configuration value.
pub fn from_json_str(text: &str) -> Result<Value, ConfigError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse TOML text into a raw configuration value.
///
/// TOML arrays may mix strings with pattern descriptors:
///
/// ```toml
/// control_type = "allowed"
/// allowed = ["Explicit name.", ["re", "i", "guest-[0-9]+"]]
/// ```
pub fn from_toml_str(text: &str) -> Result<Value, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Read and parse a TOML configuration file.
pub fn from_toml_file(path: &Path) -> Result<Value, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

/// Default configuration location used by the CLI.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("username-guard/config.toml"))
}
