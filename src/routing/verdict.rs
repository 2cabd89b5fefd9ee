//! Routing verdicts.

use serde::Serialize;

use crate::config::ProxyEndpoint;

/// How the network layer talks to a proxy target.
///
/// HTTPS destinations are tunnelled with CONNECT through an HTTP proxy,
/// so this is HTTP for both schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    Http,
}

/// One proxy candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    pub endpoint: ProxyEndpoint,
    pub kind: ProxyKind,
}

impl ProxyTarget {
    pub fn http(endpoint: ProxyEndpoint) -> Self {
        Self {
            endpoint,
            kind: ProxyKind::Http,
        }
    }
}

/// The decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingVerdict {
    /// Connect directly.
    Direct,
    /// Try these proxies in order, then fall back to a direct connection.
    /// Never empty.
    Proxy(Vec<ProxyTarget>),
}

/// A rendered entry of the verdict list handed to the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Hop {
    Http { host: String, port: u16 },
    Direct,
}

impl RoutingVerdict {
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct)
    }

    /// The first instruction, for callers without failover support.
    pub fn primary(&self) -> Option<&ProxyTarget> {
        match self {
            Self::Direct => None,
            Self::Proxy(targets) => targets.first(),
        }
    }

    /// Proxies in order, always ending with the direct fallback.
    pub fn hops(&self) -> Vec<Hop> {
        let mut hops = match self {
            Self::Direct => Vec::new(),
            Self::Proxy(targets) => targets
                .iter()
                .map(|t| match t.kind {
                    ProxyKind::Http => Hop::Http {
                        host: t.endpoint.host.clone(),
                        port: t.endpoint.port,
                    },
                })
                .collect(),
        };
        hops.push(Hop::Direct);
        hops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_hops() {
        assert_eq!(RoutingVerdict::Direct.hops(), vec![Hop::Direct]);
        assert!(RoutingVerdict::Direct.primary().is_none());
    }

    #[test]
    fn test_proxy_hops_end_with_direct() {
        let ep = ProxyEndpoint::new("proxy.local", 8080).unwrap();
        let verdict = RoutingVerdict::Proxy(vec![ProxyTarget::http(ep.clone())]);

        assert_eq!(verdict.primary().map(|t| &t.endpoint), Some(&ep));
        assert_eq!(
            serde_json::to_string(&verdict.hops()).unwrap(),
            r#"[{"type":"http","host":"proxy.local","port":8080},{"type":"direct"}]"#
        );
    }
}
