//! The compiled username admissibility checker.

use std::path::Path;

use serde_json::Value;

use crate::config::{self, ControlType};
use crate::error::{ConfigError, CONTROL_TYPE_VALUES};
use crate::rules::RuleSet;

const KEY_CONTROL_TYPE: &str = "control_type";
const KEY_ALLOWED: &str = "allowed";
const KEY_PROHIBITED: &str = "prohibited";

/// Immutable, compiled admissibility checker.
///
/// Built once from a configuration value; all validation and pattern
/// compilation happen here, so queries are cheap and infallible. The
/// checker never mutates after construction and can be shared freely
/// across threads. Reconfiguration means building a new `Checker` and
/// swapping the reference used for subsequent queries.
#[derive(Debug)]
pub struct Checker {
    control_type: ControlType,
    allowed: RuleSet,
    prohibited: RuleSet,
}

impl Checker {
    /// Build a checker from a raw configuration mapping.
    ///
    /// Validation is fail-fast: the first structural problem aborts
    /// construction with a [`ConfigError`] describing it. With
    /// `control_type = "disabled"` any `allowed`/`prohibited` keys are
    /// ignored entirely, malformed or not.
    pub fn from_value(root: &Value) -> Result<Self, ConfigError> {
        let Value::Object(map) = root else {
            return Err(ConfigError::NotAMapping {
                found: root.to_string(),
            });
        };

        let control_value =
            map.get(KEY_CONTROL_TYPE)
                .ok_or_else(|| ConfigError::MissingKey {
                    key: KEY_CONTROL_TYPE,
                    context: format!("possible values: {CONTROL_TYPE_VALUES}"),
                })?;

        let control_type = control_value
            .as_str()
            .and_then(ControlType::from_config_value)
            .ok_or_else(|| ConfigError::InvalidControlType {
                found: control_value.to_string(),
            })?;

        let mut checker = Self {
            control_type,
            allowed: RuleSet::default(),
            prohibited: RuleSet::default(),
        };

        if control_type == ControlType::Disabled {
            return Ok(checker);
        }

        if control_type.requires_allowed() {
            let value = map
                .get(KEY_ALLOWED)
                .ok_or_else(|| missing_list(KEY_ALLOWED, control_type))?;
            checker.allowed = RuleSet::from_value(KEY_ALLOWED, value)?;
        }

        if control_type.requires_prohibited() {
            let value = map
                .get(KEY_PROHIBITED)
                .ok_or_else(|| missing_list(KEY_PROHIBITED, control_type))?;
            checker.prohibited = RuleSet::from_value(KEY_PROHIBITED, value)?;
        }

        Ok(checker)
    }

    /// Build a checker from JSON configuration text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_value(&config::from_json_str(text)?)
    }

    /// Build a checker from TOML configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_value(&config::from_toml_str(text)?)
    }

    /// Build a checker from a TOML configuration file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_value(&config::from_toml_file(path)?)
    }

    /// The policy mode this checker was built with.
    pub fn control_type(&self) -> ControlType {
        self.control_type
    }

    /// Decide whether `username` may be registered.
    ///
    /// Total over any string input, including the empty string; never
    /// fails and has no side effects.
    pub fn check(&self, username: &str) -> bool {
        if self.control_type == ControlType::Disabled {
            return true;
        }

        // The allowed list is a gate: a name it rejects is rejected
        // outright, without consulting the prohibited list.
        if self.control_type.requires_allowed() && !self.allowed.matches(username) {
            return false;
        }

        if self.control_type.requires_prohibited() && self.prohibited.matches(username) {
            return false;
        }

        true
    }
}

fn missing_list(key: &'static str, control_type: ControlType) -> ConfigError {
    ConfigError::MissingKey {
        key,
        context: format!("'control_type' set to '{control_type}' requires it"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disabled_allows_everything() {
        let checker = Checker::from_value(&json!({"control_type": "disabled"})).unwrap();
        assert!(checker.check("Some name."));
        assert!(checker.check(""));
    }

    #[test]
    fn test_allowed_gate() {
        let checker = Checker::from_value(&json!({
            "control_type": "allowed",
            "allowed": ["alice"],
        }))
        .unwrap();
        assert!(checker.check("alice"));
        assert!(!checker.check("bob"));
    }

    #[test]
    fn test_prohibited_gate() {
        let checker = Checker::from_value(&json!({
            "control_type": "prohibited",
            "prohibited": ["root"],
        }))
        .unwrap();
        assert!(!checker.check("root"));
        assert!(checker.check("alice"));
    }

    #[test]
    fn test_missing_control_type() {
        let err = Checker::from_value(&json!({})).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingKey {
                key: "control_type",
                ..
            }
        ));
    }

    #[test]
    fn test_non_mapping_root() {
        let err = Checker::from_value(&json!(["disabled"])).unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping { .. }));
    }

    #[test]
    fn test_checker_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Checker>();
    }
}
