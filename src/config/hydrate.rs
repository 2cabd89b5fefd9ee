//! Payload hydration.
//!
//! # Responsibilities
//! - Turn the opaque JSON payload written by the settings UI into a
//!   [`RoutingConfig`]
//! - Coerce loosely typed fields (numeric strings, floats, nulls)
//! - Derive the HTTPS-over-HTTP alias
//!
//! # Design Decisions
//! - Never fails: a malformed field is logged and falls back to its default
//! - Flat fields win over the nested `proxySettings` shape
//! - The payload is always a full replacement, never a patch

use serde_json::{json, Map, Value};

use crate::bypass::normalize::normalize_str;
use crate::bypass::{BypassInput, BypassList};
use crate::config::schema::{ProxyEndpoint, RoutingConfig};

/// The payload stored on first install: proxy off, placeholder upstream.
pub fn default_payload() -> Value {
    json!({
        "proxyEnabled": false,
        "httpProxy": "example.com",
        "httpPort": 8080,
        "httpsProxy": "",
        "httpsPort": 0,
        "useForHttps": false,
        "bypassList": [],
    })
}

/// Build a routing snapshot from a configuration payload.
pub fn hydrate(payload: &Value) -> RoutingConfig {
    let Some(fields) = payload.as_object() else {
        tracing::warn!(payload = %payload, "Configuration payload is not an object, using defaults");
        return RoutingConfig {
            bypass: BypassList::from_input(&BypassInput::Absent),
            ..Default::default()
        };
    };

    let enabled = read_enabled(fields);
    let use_http_for_https = read_bool(fields, "useForHttps");

    let flat_http = first_present(fields, &["httpProxy", "httpHost"]);
    let legacy = if flat_http.is_none() {
        legacy_single_proxy(fields)
    } else {
        None
    };

    let (http, https, use_http_for_https, legacy_bypass) = match legacy {
        Some((endpoint, bypass)) => (endpoint, None, true, bypass),
        None => {
            let http = read_endpoint(fields, &["httpProxy", "httpHost"], "httpPort");
            let https = if use_http_for_https {
                None
            } else {
                read_endpoint(fields, &["httpsProxy", "httpsHost"], "httpsPort")
            };
            (http, https, use_http_for_https, None)
        }
    };

    let bypass_value = match fields.get("bypassList") {
        Some(v) if !v.is_null() => Some(v),
        _ => legacy_bypass,
    };
    let bypass = BypassList::from_input(&BypassInput::from_value(bypass_value));

    let config = RoutingConfig {
        enabled,
        http,
        https,
        use_http_for_https,
        bypass,
        generation: 0,
    };

    tracing::debug!(
        enabled = config.enabled,
        http = ?config.http,
        https = ?config.https_endpoint(),
        bypass_rules = config.bypass.len(),
        "Hydrated routing config"
    );
    config
}

fn first_present<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| fields.get(*k))
        .find(|v| !v.is_null())
}

fn read_enabled(fields: &Map<String, Value>) -> bool {
    match fields.get("proxyEnabled") {
        Some(Value::Bool(b)) => *b,
        None | Some(Value::Null) => match fields.get("mode").and_then(Value::as_str) {
            Some("manual") => true,
            Some("none") | None => false,
            Some(other) => {
                tracing::warn!(mode = %other, "Unknown proxy mode, treating as disabled");
                false
            }
        },
        Some(other) => {
            tracing::warn!(proxy_enabled = %other, "proxyEnabled is not a boolean, treating as disabled");
            false
        }
    }
}

fn read_bool(fields: &Map<String, Value>, key: &str) -> bool {
    match fields.get(key) {
        Some(Value::Bool(b)) => *b,
        None | Some(Value::Null) => false,
        Some(other) => {
            tracing::warn!(field = key, value = %other, "Expected a boolean, using false");
            false
        }
    }
}

fn coerce_host(key: &str, value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => normalize_str(s),
        Some(Value::Number(n)) => normalize_str(&n.to_string()),
        Some(other) => {
            tracing::warn!(field = key, value = %other, "Proxy host is not a string, disabling endpoint");
            String::new()
        }
    }
}

/// Coerce a port the way a loose numeric conversion would: integers and
/// numeric strings are accepted, fractions truncated, anything outside
/// (0, 65536) becomes 0.
pub(crate) fn coerce_port(key: &str, value: Option<&Value>) -> u16 {
    let raw = match value {
        None | Some(Value::Null) => return 0,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return 0,
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match raw.map(f64::trunc) {
        Some(p) if p > 0.0 && p < 65536.0 => p as u16,
        Some(p) if p == 0.0 => 0,
        _ => {
            tracing::warn!(field = key, value = ?value, "Invalid proxy port, disabling endpoint");
            0
        }
    }
}

fn read_endpoint(fields: &Map<String, Value>, host_keys: &[&str], port_key: &str) -> Option<ProxyEndpoint> {
    let host = coerce_host(host_keys[0], first_present(fields, host_keys));
    let port = coerce_port(port_key, fields.get(port_key));
    ProxyEndpoint::new(host, port)
}

/// The nested `proxySettings.rules` shape: one proxy for every scheme.
fn legacy_single_proxy(fields: &Map<String, Value>) -> Option<(Option<ProxyEndpoint>, Option<&Value>)> {
    let rules = fields.get("proxySettings")?.get("rules")?.as_object()?;
    let single = rules.get("singleProxy").and_then(Value::as_object);

    let endpoint = single.and_then(|proxy| {
        let host = coerce_host("singleProxy.host", proxy.get("host"));
        let port = coerce_port("singleProxy.port", proxy.get("port"));
        ProxyEndpoint::new(host, port)
    });

    tracing::debug!(endpoint = ?endpoint, "Using nested proxySettings payload");
    Some((endpoint, rules.get("bypassList")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bypass::DEFAULT_BYPASS;

    #[test]
    fn test_full_payload() {
        let config = hydrate(&json!({
            "proxyEnabled": true,
            "httpProxy": " Proxy.Local. ",
            "httpPort": 8080,
            "httpsProxy": "secure.local",
            "httpsPort": "8443",
            "useForHttps": false,
            "bypassList": "example.com, .corp.internal",
        }));

        assert!(config.enabled);
        assert_eq!(config.http, ProxyEndpoint::new("proxy.local", 8080));
        assert_eq!(config.https, ProxyEndpoint::new("secure.local", 8443));
        assert!(!config.use_http_for_https);
        assert_eq!(config.bypass.len(), DEFAULT_BYPASS.len() + 2);
        assert_eq!(
            config.bypass.to_strings().last().map(String::as_str),
            Some("corp.internal")
        );
    }

    #[test]
    fn test_alias_does_not_store_https() {
        let config = hydrate(&json!({
            "proxyEnabled": true,
            "httpProxy": "p",
            "httpPort": 1111,
            "httpsProxy": "ignored",
            "httpsPort": 2222,
            "useForHttps": true,
        }));
        assert!(config.https.is_none());
        assert_eq!(config.https_endpoint(), ProxyEndpoint::new("p", 1111).as_ref());
    }

    #[test]
    fn test_port_coercion() {
        assert_eq!(coerce_port("p", Some(&json!(8080))), 8080);
        assert_eq!(coerce_port("p", Some(&json!("3128"))), 3128);
        assert_eq!(coerce_port("p", Some(&json!(" 80 "))), 80);
        assert_eq!(coerce_port("p", Some(&json!(8080.9))), 8080);
        assert_eq!(coerce_port("p", Some(&json!(65535))), 65535);
        assert_eq!(coerce_port("p", Some(&json!(65536))), 0);
        assert_eq!(coerce_port("p", Some(&json!(-1))), 0);
        assert_eq!(coerce_port("p", Some(&json!("abc"))), 0);
        assert_eq!(coerce_port("p", Some(&json!(""))), 0);
        assert_eq!(coerce_port("p", Some(&json!(true))), 0);
        assert_eq!(coerce_port("p", None), 0);
    }

    #[test]
    fn test_bad_port_disables_endpoint() {
        let config = hydrate(&json!({
            "proxyEnabled": true,
            "httpProxy": "proxy.local",
            "httpPort": 70000,
        }));
        assert!(config.enabled);
        assert!(config.http.is_none());
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let config = hydrate(&json!({
            "proxyEnabled": "yes",
            "httpProxy": ["not", "a", "host"],
            "httpPort": 8080,
            "useForHttps": 1,
            "bypassList": {"oops": true},
        }));
        assert!(!config.enabled);
        assert!(config.http.is_none());
        assert!(!config.use_http_for_https);
        assert_eq!(config.bypass.len(), DEFAULT_BYPASS.len());
    }

    #[test]
    fn test_non_object_payload() {
        for payload in [json!(null), json!("text"), json!([1, 2])] {
            let config = hydrate(&payload);
            assert!(!config.enabled);
            assert!(config.http.is_none());
            assert_eq!(config.bypass.len(), DEFAULT_BYPASS.len());
        }
    }

    #[test]
    fn test_settings_form_aliases() {
        let config = hydrate(&json!({
            "mode": "manual",
            "httpHost": "form.proxy",
            "httpPort": 3128,
            "useForHttps": true,
            "httpsHost": "form.proxy",
            "httpsPort": 3128,
            "bypassList": ["127.0.0.1/8", ".net.nz", "intranet"],
        }));
        assert!(config.enabled);
        assert_eq!(config.http, ProxyEndpoint::new("form.proxy", 3128));
        assert!(config.https_endpoint().is_some());
        assert!(config.bypass.to_strings().contains(&"intranet".to_string()));
    }

    #[test]
    fn test_proxy_enabled_wins_over_mode() {
        let config = hydrate(&json!({"proxyEnabled": false, "mode": "manual"}));
        assert!(!config.enabled);
    }

    #[test]
    fn test_nested_proxy_settings() {
        let config = hydrate(&json!({
            "proxyEnabled": true,
            "proxySettings": {
                "mode": "fixed_servers",
                "rules": {
                    "singleProxy": {"scheme": "http", "host": "chrome.proxy", "port": 8080},
                    "bypassList": ["*.internal"],
                },
            },
        }));
        assert!(config.enabled);
        assert!(config.use_http_for_https);
        assert_eq!(config.http, ProxyEndpoint::new("chrome.proxy", 8080));
        assert_eq!(config.https_endpoint(), config.http.as_ref());
        assert!(config.bypass.to_strings().contains(&"*.internal".to_string()));
    }

    #[test]
    fn test_default_payload_is_disabled() {
        let config = hydrate(&default_payload());
        assert!(!config.enabled);
        assert_eq!(config.http, ProxyEndpoint::new("example.com", 8080));
        assert!(config.https.is_none());
    }
}
