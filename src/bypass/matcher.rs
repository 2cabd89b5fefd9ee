//! Bypass matching.
//!
//! # Responsibilities
//! - Describe a request destination (host + literal IPv4 form)
//! - Evaluate a compiled rule list with OR semantics
//!
//! # Design Decisions
//! - Rules are compiled once per configuration, never per request
//! - O(n) scan over rules; n is small and there is no regex
//! - The first matching rule is reported for logging only

use crate::bypass::address::parse_ipv4;
use crate::bypass::normalize::{normalize, BypassInput};
use crate::bypass::rule::BypassRule;

/// Trait for matching destinations against bypass conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the destination should bypass the proxy.
    fn matches(&self, dest: &Destination) -> bool;
}

/// The part of a request consulted by bypass rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    host: String,
    ipv4: Option<u32>,
}

impl Destination {
    /// Build a destination from a hostname.
    /// The host is lower-cased and additionally parsed as an IPv4 literal.
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into().to_lowercase();
        let ipv4 = parse_ipv4(&host).ok();
        Self { host, ipv4 }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The host as an IPv4 value, when it is a literal address.
    pub fn ipv4(&self) -> Option<u32> {
        self.ipv4
    }
}

/// A compiled, deduplicated list of bypass rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BypassList {
    rules: Vec<BypassRule>,
}

impl BypassList {
    /// Compile canonical rule strings.
    pub fn compile<I, S>(canonical: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rules: canonical.into_iter().map(BypassRule::compile).collect(),
        }
    }

    /// Normalize raw input (merging defaults) and compile it.
    pub fn from_input(input: &BypassInput) -> Self {
        Self::compile(normalize(input))
    }

    /// The first rule matching the destination.
    pub fn find_match(&self, dest: &Destination) -> Option<&BypassRule> {
        self.rules.iter().find(|rule| rule.matches(dest))
    }

    pub fn rules(&self) -> &[BypassRule] {
        &self.rules
    }

    /// Canonical rule strings in insertion order.
    pub fn to_strings(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.as_str().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Matcher for BypassList {
    fn matches(&self, dest: &Destination) -> bool {
        // Any rule is enough (OR)
        self.find_match(dest).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(rules: &[&str]) -> BypassList {
        BypassList::compile(rules.iter().copied())
    }

    #[test]
    fn test_destination() {
        let d = Destination::new("Example.COM");
        assert_eq!(d.host(), "example.com");
        assert_eq!(d.ipv4(), None);

        let d = Destination::new("10.0.0.1");
        assert_eq!(d.ipv4(), Some(0x0a00_0001));
    }

    #[test]
    fn test_any_rule_matches() {
        let rules = list(&["*.example.com", "10.0.0.0/8", "corp.internal"]);
        assert!(rules.matches(&Destination::new("a.example.com")));
        assert!(rules.matches(&Destination::new("10.20.30.40")));
        assert!(rules.matches(&Destination::new("git.corp.internal")));
        assert!(!rules.matches(&Destination::new("example.com")));
        assert!(!rules.matches(&Destination::new("11.0.0.1")));
    }

    #[test]
    fn test_malformed_rule_does_not_stop_evaluation() {
        let rules = list(&["300.1.1.1/8", "10.0.0.0/99", "example.com"]);
        let dest = Destination::new("www.example.com");
        assert_eq!(rules.find_match(&dest).map(BypassRule::as_str), Some("example.com"));
    }

    #[test]
    fn test_empty_list_never_matches() {
        assert!(!BypassList::default().matches(&Destination::new("localhost")));
    }

    #[test]
    fn test_from_input_includes_defaults() {
        let rules = BypassList::from_input(&BypassInput::Absent);
        assert!(rules.matches(&Destination::new("127.0.0.2")));
        assert!(rules.matches(&Destination::new("192.168.1.42")));
        assert!(rules.matches(&Destination::new("shop.net.nz")));
        assert!(!rules.matches(&Destination::new("192.168.2.1")));
    }
}
