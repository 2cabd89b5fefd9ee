//! Compiled bypass rules.
//!
//! A canonical rule string is classified exactly once, in this order:
//! loopback literal, CIDR (anything containing `/`), `*.` wildcard,
//! everything else. Matching is then a single dispatch.
//!
//! A plain IPv4 literal such as `10.1.1.1` is not special: it is a bare
//! rule, so it also matches hosts ending in `.10.1.1.1`. `url` rejects such
//! hosts, but direct callers of [`BypassRule`] see the same result as the
//! equality-then-suffix evaluation.

use std::fmt;

use crate::bypass::address::{contained_in, parse_cidr};
use crate::bypass::matcher::{Destination, Matcher};

const LOOPBACK: [&str; 3] = ["localhost", "127.0.0.1", "::1"];

fn is_loopback(host: &str) -> bool {
    LOOPBACK.contains(&host)
}

/// Shape of a compiled rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// `localhost`, `127.0.0.1` or `::1`; matches any of the three.
    Loopback,
    /// IPv4 prefix; only matches literal IPv4 hosts.
    Cidr { base: u32, prefix: u8 },
    /// `*.domain`; matches strict subdomains only.
    WildcardSuffix { suffix: String },
    /// Plain name or IPv4 literal; matches itself and any subdomain.
    BareDomain { dotted: String },
    /// Contains `/` but is not a valid IPv4 CIDR. Never matches.
    Malformed,
}

/// A bypass rule: canonical text plus its compiled shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BypassRule {
    text: String,
    kind: RuleKind,
}

impl BypassRule {
    /// Classify a canonical rule string.
    pub fn compile(canonical: impl Into<String>) -> Self {
        let text = canonical.into();

        let kind = if is_loopback(&text) {
            RuleKind::Loopback
        } else if text.contains('/') {
            match parse_cidr(&text) {
                Ok((base, prefix)) => RuleKind::Cidr { base, prefix },
                Err(e) => {
                    tracing::warn!(rule = %text, error = %e, "Bypass rule will never match");
                    RuleKind::Malformed
                }
            }
        } else if let Some(domain) = text.strip_prefix("*.") {
            RuleKind::WildcardSuffix {
                suffix: format!(".{domain}"),
            }
        } else {
            RuleKind::BareDomain {
                dotted: format!(".{text}"),
            }
        };

        Self { text, kind }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }
}

impl Matcher for BypassRule {
    fn matches(&self, dest: &Destination) -> bool {
        let host = dest.host();
        match &self.kind {
            RuleKind::Loopback => is_loopback(host),
            RuleKind::Cidr { base, prefix } => dest
                .ipv4()
                .is_some_and(|ip| contained_in(ip, *base, *prefix)),
            RuleKind::WildcardSuffix { suffix } => host.ends_with(suffix.as_str()),
            RuleKind::BareDomain { dotted } => host == self.text || host.ends_with(dotted.as_str()),
            RuleKind::Malformed => false,
        }
    }
}

impl fmt::Display for BypassRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
