//! Bypass rule normalization.
//!
//! # Responsibilities
//! - Accept bypass input as a list, a delimited string, or nothing
//! - Canonicalize each token (trim, one trailing dot, lower-case, leading dots)
//! - Merge the built-in defaults and drop duplicates
//!
//! # Design Decisions
//! - Defaults come first so they stay stable across user edits
//! - Only one trailing dot is removed while every leading dot is; this keeps
//!   `example.com.` and `example.com` equivalent without rewriting odder input
//! - Pure function: the same input always yields the same list

use std::collections::HashSet;

use serde_json::Value;

/// Rules that are always bypassed, regardless of user input.
pub const DEFAULT_BYPASS: &[&str] = &[
    "localhost",
    "127.0.0.1",
    "::1",
    "127.0.0.0/8",
    "192.168.1.0/24",
    "net.nz",
];

/// Raw bypass configuration before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BypassInput {
    /// One rule per element.
    List(Vec<String>),
    /// Rules separated by commas or newlines.
    Delimited(String),
    /// No bypass configuration.
    #[default]
    Absent,
}

impl BypassInput {
    /// Coerce a JSON value into bypass input.
    ///
    /// Numbers and booleans are stringified, `null` list elements are dropped
    /// and nested structures are skipped with a warning.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(s)) => Self::Delimited(s.clone()),
            Some(Value::Array(items)) => Self::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        Value::Null => None,
                        other => {
                            tracing::warn!(entry = %other, "Ignoring non-scalar bypass entry");
                            None
                        }
                    })
                    .collect(),
            ),
            Some(Value::Number(n)) => Self::List(vec![n.to_string()]),
            Some(Value::Bool(b)) => Self::List(vec![b.to_string()]),
            Some(other @ Value::Object(_)) => {
                tracing::warn!(bypass_list = %other, "bypassList is an object, ignoring it");
                Self::Absent
            }
        }
    }

    fn tokens(&self) -> Vec<&str> {
        match self {
            Self::List(items) => items.iter().map(String::as_str).collect(),
            Self::Delimited(text) => text.split([',', '\n']).collect(),
            Self::Absent => Vec::new(),
        }
    }
}

impl From<Vec<String>> for BypassInput {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<&str> for BypassInput {
    fn from(text: &str) -> Self {
        Self::Delimited(text.to_string())
    }
}

/// Trim, drop a single trailing dot and lower-case.
///
/// Shared with proxy host normalization.
pub fn normalize_str(s: &str) -> String {
    let s = s.trim();
    s.strip_suffix('.').unwrap_or(s).to_lowercase()
}

/// Canonical form of one rule token; empty when nothing is left.
pub fn canonical_rule(token: &str) -> String {
    normalize_str(token)
        .trim_start_matches('.')
        .trim()
        .to_string()
}

/// Normalize bypass input into the canonical, deduplicated rule list.
pub fn normalize(input: &BypassInput) -> Vec<String> {
    let mut tokens: Vec<&str> = DEFAULT_BYPASS.to_vec();
    tokens.extend(input.tokens());

    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .map(canonical_rule)
        .filter(|rule| !rule.is_empty())
        .filter(|rule| seen.insert(rule.clone()))
        .collect()
}

/// Rules in `rules` that are not part of the built-in defaults.
pub fn user_rules(rules: &[String]) -> Vec<String> {
    let defaults: HashSet<String> = DEFAULT_BYPASS.iter().map(|r| canonical_rule(r)).collect();
    rules
        .iter()
        .filter(|rule| !defaults.contains(*rule))
        .cloned()
        .collect()
}
