//! Rule parsing and compiled rule sets.
//!
//! An `allowed`/`prohibited` list mixes exact-match strings with 3-element
//! pattern descriptors `["re", <flags>, <pattern>]`. Lists are parsed once
//! at construction into a literal set and an ordered list of compiled
//! regexes; queries never touch the raw configuration again.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::error::ConfigError;

/// Marker string introducing a pattern descriptor.
const PATTERN_MARKER: &str = "re";

/// A single parsed admissibility rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Exact string equality.
    Literal(String),

    /// Prefix-anchored regular expression.
    Pattern(Regex),
}

/// Flags accepted in the second slot of a pattern descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFlags {
    /// `i`: match regardless of case.
    pub case_insensitive: bool,
}

impl PatternFlags {
    /// Parse a flags string such as `""` or `"i"`.
    ///
    /// The first unrecognized character aborts parsing.
    fn parse(flags: &str, list: &'static str, position: usize) -> Result<Self, ConfigError> {
        let mut parsed = Self::default();
        for flag in flags.chars() {
            match flag {
                'i' => parsed.case_insensitive = true,
                other => {
                    return Err(ConfigError::UnknownFlag {
                        flag: other,
                        list,
                        position,
                    })
                }
            }
        }
        Ok(parsed)
    }
}

/// Compile `pattern` anchored at the start of the candidate string.
///
/// Matching a prefix is sufficient: the pattern is wrapped as `^(?:...)`,
/// so it succeeds when it matches from position 0 without having to
/// consume the whole candidate.
fn compile_anchored(
    pattern: &str,
    flags: PatternFlags,
    list: &'static str,
    position: usize,
) -> Result<Regex, ConfigError> {
    RegexBuilder::new(&format!("^(?:{pattern})"))
        .case_insensitive(flags.case_insensitive)
        .build()
        .map_err(|source| ConfigError::PatternSyntax {
            list,
            position,
            source,
        })
}

/// Parse one list element into a [`Rule`].
///
/// A string is a literal rule. Anything else must be a 3-element
/// descriptor: the `"re"` marker, a flags string, and a pattern string.
fn parse_element(list: &'static str, position: usize, element: &Value) -> Result<Rule, ConfigError> {
    if let Value::String(text) = element {
        return Ok(Rule::Literal(text.clone()));
    }

    let Value::Array(triple) = element else {
        return Err(ConfigError::InvalidElementType {
            list,
            position,
            found: element.to_string(),
        });
    };

    if triple.len() != 3 {
        return Err(ConfigError::InvalidTupleLength {
            list,
            position,
            len: triple.len(),
        });
    }

    if triple[0].as_str() != Some(PATTERN_MARKER) {
        return Err(ConfigError::InvalidPatternMarker {
            list,
            position,
            found: triple[0].to_string(),
        });
    }

    let Some(flags) = triple[1].as_str() else {
        return Err(ConfigError::InvalidFlagsType {
            list,
            position,
            found: triple[1].to_string(),
        });
    };
    let flags = PatternFlags::parse(flags, list, position)?;

    let Some(pattern) = triple[2].as_str() else {
        return Err(ConfigError::InvalidPatternType { list, position });
    };

    compile_anchored(pattern, flags, list, position).map(Rule::Pattern)
}

/// A compiled rule list: literals in a set for O(1) lookup, patterns in
/// declaration order.
#[derive(Debug, Default)]
pub struct RuleSet {
    literals: HashSet<String>,
    patterns: Vec<Regex>,
}

impl RuleSet {
    /// Parse and compile a whole `allowed`/`prohibited` list value.
    ///
    /// Fails on the first structural problem; `list` names the owning key
    /// for error reporting.
    pub(crate) fn from_value(list: &'static str, value: &Value) -> Result<Self, ConfigError> {
        // A single string where a list was meant is a common misconfiguration,
        // reported distinctly from other non-sequence values.
        if value.is_string() {
            return Err(ConfigError::StringAsList { list });
        }
        let Value::Array(elements) = value else {
            return Err(ConfigError::NotASequence {
                list,
                found: value.to_string(),
            });
        };

        let mut set = Self::default();
        for (position, element) in elements.iter().enumerate() {
            match parse_element(list, position, element)? {
                Rule::Literal(text) => {
                    set.literals.insert(text);
                }
                Rule::Pattern(regex) => set.patterns.push(regex),
            }
        }
        Ok(set)
    }

    /// True if `candidate` equals a literal or prefix-matches any pattern.
    ///
    /// Literals are consulted first, then patterns in declaration order,
    /// short-circuiting on the first hit.
    pub fn matches(&self, candidate: &str) -> bool {
        self.literals.contains(candidate) || self.patterns.iter().any(|p| p.is_match(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flags_empty() {
        let flags = PatternFlags::parse("", "allowed", 0).unwrap();
        assert!(!flags.case_insensitive);
    }

    #[test]
    fn test_flags_case_insensitive() {
        let flags = PatternFlags::parse("i", "allowed", 0).unwrap();
        assert!(flags.case_insensitive);
    }

    #[test]
    fn test_flags_first_unknown_reported() {
        let err = PatternFlags::parse("qwe", "prohibited", 2).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownFlag {
                flag: 'q',
                list: "prohibited",
                position: 2,
            }
        ));
    }

    #[test]
    fn test_prefix_anchoring() {
        let re = compile_anchored("pA+ttern", PatternFlags::default(), "allowed", 0).unwrap();
        assert!(re.is_match("pAttern"));
        assert!(re.is_match("pAAAttern"));
        // Prefix match is enough.
        assert!(re.is_match("pAttern with a suffix"));
        // Lower-case 'a' and a shifted start are not.
        assert!(!re.is_match("pattern"));
        assert!(!re.is_match("xpAttern"));
    }

    #[test]
    fn test_case_insensitive_pattern() {
        let flags = PatternFlags {
            case_insensitive: true,
        };
        let re = compile_anchored("sTrAnGe", flags, "allowed", 0).unwrap();
        assert!(re.is_match("strange"));
        assert!(re.is_match("STRANGE"));
    }

    #[test]
    fn test_parse_literal_element() {
        let rule = parse_element("allowed", 0, &json!("Explicit name.")).unwrap();
        assert!(matches!(rule, Rule::Literal(ref text) if text == "Explicit name."));
    }

    #[test]
    fn test_parse_pattern_element() {
        let rule = parse_element("allowed", 1, &json!(["re", "i", "guest-[0-9]+"])).unwrap();
        match rule {
            Rule::Pattern(re) => assert!(re.is_match("Guest-42")),
            other => panic!("expected pattern rule, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_non_element() {
        let err = parse_element("prohibited", 0, &json!(123)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidElementType { position: 0, .. }));
    }

    #[test]
    fn test_parse_rejects_short_tuple() {
        let err = parse_element("prohibited", 0, &json!([1])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTupleLength { len: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_bad_marker() {
        let err = parse_element("prohibited", 0, &json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPatternMarker { .. }));
    }

    #[test]
    fn test_parse_rejects_bad_flags_type() {
        let err = parse_element("prohibited", 0, &json!(["re", 2, 3])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlagsType { .. }));
    }

    #[test]
    fn test_parse_rejects_bad_pattern_type() {
        let err = parse_element("prohibited", 0, &json!(["re", "", 3])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPatternType { .. }));
    }

    #[test]
    fn test_parse_rejects_invalid_regex() {
        let err = parse_element("allowed", 0, &json!(["re", "", "("])).unwrap_err();
        assert!(matches!(err, ConfigError::PatternSyntax { .. }));
    }

    #[test]
    fn test_rule_set_matching() {
        let set = RuleSet::from_value(
            "allowed",
            &json!(["Explicit name.", ["re", "", "pA+ttern"], ["re", "i", "sTrAnGe"]]),
        )
        .unwrap();

        assert!(set.matches("Explicit name."));
        assert!(set.matches("pAttern"));
        assert!(set.matches("STRANGE"));
        assert!(!set.matches("pattern"));
        assert!(!set.matches("not allowed"));
    }

    #[test]
    fn test_rule_set_rejects_bare_string() {
        let err = RuleSet::from_value("allowed", &json!("Name")).unwrap_err();
        assert!(matches!(err, ConfigError::StringAsList { list: "allowed" }));
    }

    #[test]
    fn test_rule_set_rejects_non_sequence() {
        let err = RuleSet::from_value("allowed", &json!(123)).unwrap_err();
        assert!(matches!(err, ConfigError::NotASequence { list: "allowed", .. }));
    }

    #[test]
    fn test_empty_rule_set_matches_nothing() {
        let set = RuleSet::from_value("allowed", &json!([])).unwrap();
        assert!(!set.matches("anything"));
        assert!(!set.matches(""));
    }
}
