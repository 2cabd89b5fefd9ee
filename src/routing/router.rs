//! Per-request routing decision.
//!
//! # Responsibilities
//! - Parse the destination URL and extract its host
//! - Consult the bypass list
//! - Pick the endpoint for the destination scheme
//!
//! # Design Decisions
//! - Pure function of (snapshot, url); no I/O, no locks
//! - Fails open: anything unexpected yields `Direct`
//! - Direct fallback is implicit in the verdict, rendered by `hops()`

use url::{Host, Url};

use crate::bypass::{Destination, Matcher};
use crate::config::{ProxyEndpoint, RoutingConfig};
use crate::observability::metrics::{self, DecisionReason};
use crate::routing::verdict::{ProxyTarget, RoutingVerdict};

/// Extract the bypass-relevant destination from a parsed URL.
///
/// IPv6 hosts are rendered without brackets so `::1` compares as written.
pub fn destination(url: &Url) -> Option<Destination> {
    let host = match url.host()? {
        Host::Domain(d) => d.to_string(),
        Host::Ipv4(addr) => addr.to_string(),
        Host::Ipv6(addr) => addr.to_string(),
    };
    Some(Destination::new(host))
}

/// Only `https` goes to the HTTPS endpoint; `wss` and the rest use HTTP.
fn is_secure(url: &Url) -> bool {
    url.scheme() == "https"
}

fn decide(config: &RoutingConfig, url: &str) -> (RoutingVerdict, DecisionReason) {
    if !config.enabled {
        return (RoutingVerdict::Direct, DecisionReason::Disabled);
    }

    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Unparsable destination, going direct");
            return (RoutingVerdict::Direct, DecisionReason::InvalidUrl);
        }
    };

    let Some(dest) = destination(&parsed) else {
        tracing::debug!(url = %url, "Destination has no host, going direct");
        return (RoutingVerdict::Direct, DecisionReason::NoHost);
    };

    if let Some(rule) = config.bypass.find_match(&dest) {
        tracing::debug!(host = %dest.host(), rule = %rule, "Bypass rule matched");
        return (RoutingVerdict::Direct, DecisionReason::Bypassed);
    }

    let endpoint: Option<&ProxyEndpoint> = if is_secure(&parsed) {
        config.https_endpoint()
    } else {
        config.http_endpoint()
    };

    match endpoint {
        Some(ep) => (
            RoutingVerdict::Proxy(vec![ProxyTarget::http(ep.clone())]),
            DecisionReason::Proxied,
        ),
        None => {
            tracing::debug!(host = %dest.host(), scheme = parsed.scheme(), "No endpoint configured, going direct");
            (RoutingVerdict::Direct, DecisionReason::NoEndpoint)
        }
    }
}

/// Decide how to reach `url` under `config`.
pub fn route(config: &RoutingConfig, url: &str) -> RoutingVerdict {
    let (verdict, reason) = decide(config, url);
    metrics::record_decision(reason);
    verdict
}

/// Returns true if `url` would bypass the proxy under `config`'s rules,
/// regardless of whether proxying is enabled.
pub fn is_bypassed(config: &RoutingConfig, url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| destination(&u))
        .is_some_and(|dest| config.bypass.matches(&dest))
}
