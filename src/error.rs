//! Configuration error taxonomy.
//!
//! Every variant is raised during `Checker` construction. Queries never
//! fail: `check` is total over any string input.

use thiserror::Error;

/// Recognized `control_type` values, for error messages.
pub(crate) const CONTROL_TYPE_VALUES: &str =
    "'allowed', 'prohibited', 'allowed_and_prohibited' and 'disabled'";

/// A defect in the checker configuration.
///
/// All of these abort construction entirely; no partially usable checker
/// is ever returned. They indicate an operator mistake and should be
/// surfaced at application startup, not at request time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration root is not a mapping with string keys.
    #[error("configuration root must be a mapping, got '{found}'")]
    NotAMapping { found: String },

    /// A structurally required key is absent.
    #[error("'{key}' key is expected ({context})")]
    MissingKey { key: &'static str, context: String },

    /// `control_type` is not one of the recognized values.
    #[error("'control_type' must be one of {}; got '{found}'", CONTROL_TYPE_VALUES)]
    InvalidControlType { found: String },

    /// A bare string supplied where a rule sequence was required.
    #[error("the value of '{list}' must be a sequence of rules, not a single string")]
    StringAsList { list: &'static str },

    /// A non-sequence value supplied where a rule sequence was required.
    #[error("the value of '{list}' must be a sequence of rules; got '{found}'")]
    NotASequence { list: &'static str, found: String },

    /// A list element is neither a string nor a 3-element pattern descriptor.
    #[error(
        "elements of '{list}' must be strings or 3-element pattern descriptors; \
         element on position {position}: '{found}'"
    )]
    InvalidElementType {
        list: &'static str,
        position: usize,
        found: String,
    },

    /// A pattern descriptor does not have exactly three members.
    #[error(
        "3-element pattern descriptor expected in '{list}' on position {position}, \
         got {len} member(s)"
    )]
    InvalidTupleLength {
        list: &'static str,
        position: usize,
        len: usize,
    },

    /// The first member of a pattern descriptor is not the `"re"` marker.
    #[error(
        "first member of descriptor in '{list}' on position {position} must be 're'; \
         got '{found}'"
    )]
    InvalidPatternMarker {
        list: &'static str,
        position: usize,
        found: String,
    },

    /// The flags member of a pattern descriptor is not a string.
    #[error(
        "second member of descriptor in '{list}' on position {position} must be \
         a flags string; got '{found}'"
    )]
    InvalidFlagsType {
        list: &'static str,
        position: usize,
        found: String,
    },

    /// An unrecognized character inside a flags string.
    #[error("unknown flag '{flag}' in '{list}' on position {position}; possible flags: 'i'")]
    UnknownFlag {
        flag: char,
        list: &'static str,
        position: usize,
    },

    /// The pattern member of a descriptor is not a string.
    #[error("third member of descriptor in '{list}' on position {position} must be a pattern string")]
    InvalidPatternType { list: &'static str, position: usize },

    /// The pattern text failed to compile.
    #[error("invalid pattern in '{list}' on position {position}: {source}")]
    PatternSyntax {
        list: &'static str,
        position: usize,
        #[source]
        source: regex::Error,
    },

    /// Configuration text is not valid JSON.
    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration text is not valid TOML.
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}
