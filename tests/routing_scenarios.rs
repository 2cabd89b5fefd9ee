//! End-to-end routing scenarios: payload in, verdict out.

use proxy_router::routing::{Hop, RoutingVerdict};
use proxy_router::{hydrate, route};
use serde_json::json;

mod common;

#[test]
fn test_bypassed_host_goes_direct() {
    let config = hydrate(&common::scenario_payload());
    assert_eq!(route(&config, "http://example.com/"), RoutingVerdict::Direct);
    assert_eq!(route(&config, "http://cdn.example.com/a.js"), RoutingVerdict::Direct);
}

#[test]
fn test_other_host_is_proxied_with_direct_fallback() {
    let config = hydrate(&common::scenario_payload());
    let verdict = route(&config, "http://other.test/");

    assert_eq!(common::primary(&verdict).as_deref(), Some("proxy.local:8080"));
    assert_eq!(
        verdict.hops(),
        vec![
            Hop::Http {
                host: "proxy.local".into(),
                port: 8080
            },
            Hop::Direct,
        ]
    );
}

#[test]
fn test_disabled_routes_everything_direct() {
    let mut payload = common::scenario_payload();
    payload["proxyEnabled"] = json!(false);
    let config = hydrate(&payload);

    for url in ["http://other.test/", "https://other.test/", "http://10.0.0.1/"] {
        assert!(route(&config, url).is_direct(), "{url}");
    }
}

#[test]
fn test_https_uses_http_endpoint_when_shared() {
    let config = hydrate(&json!({
        "proxyEnabled": true,
        "useForHttps": true,
        "httpProxy": "p",
        "httpPort": 1111,
    }));
    let verdict = route(&config, "https://site.test/");
    assert_eq!(common::primary(&verdict).as_deref(), Some("p:1111"));
}

#[test]
fn test_https_without_https_endpoint_goes_direct() {
    let config = hydrate(&json!({
        "proxyEnabled": true,
        "useForHttps": false,
        "httpProxy": "p",
        "httpPort": 1111,
    }));
    assert!(route(&config, "https://site.test/").is_direct());
    assert!(!route(&config, "http://site.test/").is_direct());
}

#[test]
fn test_unparsable_url_goes_direct() {
    let config = hydrate(&common::scenario_payload());
    assert_eq!(route(&config, "not a url"), RoutingVerdict::Direct);
}

#[test]
fn test_cidr_and_wildcard_rules() {
    let config = hydrate(&json!({
        "proxyEnabled": true,
        "httpProxy": "proxy.local",
        "httpPort": 8080,
        "bypassList": "10.0.0.0/8\n*.corp.test, .Intranet.",
    }));

    assert!(route(&config, "http://10.200.0.7:8080/").is_direct());
    assert!(route(&config, "http://git.corp.test/").is_direct());
    assert!(!route(&config, "http://corp.test/").is_direct());
    assert!(route(&config, "http://intranet/").is_direct());
    assert!(route(&config, "http://wiki.intranet/").is_direct());
    assert!(!route(&config, "http://notintranet/").is_direct());
    assert!(!route(&config, "http://11.0.0.1/").is_direct());
}

#[test]
fn test_default_rules_always_apply() {
    let config = hydrate(&json!({
        "proxyEnabled": true,
        "httpProxy": "proxy.local",
        "httpPort": 8080,
        "bypassList": [],
    }));

    for url in [
        "http://localhost/",
        "http://127.0.0.1:9000/",
        "http://127.8.8.8/",
        "http://[::1]/",
        "http://192.168.1.20/",
        "https://www.govt.net.nz/",
    ] {
        assert!(route(&config, url).is_direct(), "{url}");
    }
    assert!(!route(&config, "http://192.168.2.20/").is_direct());
}

#[test]
fn test_invalid_port_disables_proxy() {
    let config = hydrate(&json!({
        "proxyEnabled": true,
        "httpProxy": "proxy.local",
        "httpPort": "99999",
    }));
    assert!(route(&config, "http://other.test/").is_direct());
}
