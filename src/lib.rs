//! username-guard - configurable admissibility checks for usernames
//!
//! This library decides whether a candidate username may be registered,
//! based on a declarative configuration of allowed and prohibited rules.
//!
//! # Features
//!
//! - **Control types**: disabled, allowed-list, prohibited-list, or both
//! - **Literal rules**: exact string equality, stored in a set
//! - **Pattern rules**: prefix-anchored regexes, optionally case-insensitive
//! - **Fail-fast validation**: any configuration defect aborts construction
//! - **Infallible queries**: `check` is a pure, total function over strings
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use username_guard::Checker;
//!
//! let config = json!({
//!     "control_type": "allowed_and_prohibited",
//!     "allowed": ["alice", ["re", "i", "guest-[0-9]+"]],
//!     "prohibited": [["re", "", "guest-13"]],
//! });
//!
//! let checker = Checker::from_value(&config).unwrap();
//! assert!(checker.check("alice"));
//! assert!(checker.check("Guest-42"));
//! assert!(!checker.check("guest-13"));
//! assert!(!checker.check("mallory"));
//! ```

pub mod checker;
pub mod config;
pub mod error;
pub mod rules;

// Re-exports for convenience
pub use checker::Checker;
pub use config::ControlType;
pub use error::ConfigError;
pub use rules::{PatternFlags, Rule, RuleSet};
