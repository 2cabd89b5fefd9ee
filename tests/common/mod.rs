//! Shared utilities for integration tests.

use std::io::Write;
use std::path::Path;

use serde_json::{json, Value};

/// The payload from the basic routing scenario: proxy on, one bypass rule.
#[allow(dead_code)]
pub fn scenario_payload() -> Value {
    json!({
        "proxyEnabled": true,
        "httpProxy": "proxy.local",
        "httpPort": 8080,
        "bypassList": ["example.com"],
    })
}

/// Write `payload` to `path` in one go, so watchers never see a partial file.
#[allow(dead_code)]
pub fn write_json(path: &Path, payload: &Value) {
    let tmp = path.with_extension("tmp");
    let mut file = std::fs::File::create(&tmp).unwrap();
    file.write_all(serde_json::to_string(payload).unwrap().as_bytes()).unwrap();
    file.sync_all().unwrap();
    std::fs::rename(&tmp, path).unwrap();
}

/// Host and port of the first proxy in a verdict, as `host:port`.
#[allow(dead_code)]
pub fn primary(verdict: &proxy_router::RoutingVerdict) -> Option<String> {
    verdict.primary().map(|t| t.endpoint.to_string())
}
