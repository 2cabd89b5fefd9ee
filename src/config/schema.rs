//! Configuration schema definitions.
//!
//! Two kinds of configuration live here:
//! - [`RoutingConfig`], the hydrated routing snapshot (never deserialized
//!   directly; see `hydrate.rs`)
//! - [`Settings`], the daemon's own TOML settings file

use serde::{Deserialize, Serialize, Serializer};

use crate::bypass::BypassList;

/// An upstream proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
}

impl ProxyEndpoint {
    /// Build an endpoint, or `None` when the host is empty or the port is 0.
    pub fn new(host: impl Into<String>, port: u16) -> Option<Self> {
        let host = host.into();
        if host.is_empty() || port == 0 {
            return None;
        }
        Some(Self { host, port })
    }
}

impl std::fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// The routing snapshot: everything a decision needs.
///
/// Immutable once built. Updates replace the whole value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoutingConfig {
    /// Proxying is on.
    pub enabled: bool,

    /// Endpoint for plain HTTP destinations.
    pub http: Option<ProxyEndpoint>,

    /// Endpoint for HTTPS destinations; always `None` when aliased.
    pub https: Option<ProxyEndpoint>,

    /// Route HTTPS through the HTTP endpoint.
    pub use_http_for_https: bool,

    /// Compiled bypass rules (defaults included).
    #[serde(serialize_with = "serialize_bypass")]
    pub bypass: BypassList,

    /// Snapshot generation, stamped by `RoutingState`.
    pub generation: u64,
}

impl RoutingConfig {
    pub fn http_endpoint(&self) -> Option<&ProxyEndpoint> {
        self.http.as_ref()
    }

    /// Endpoint used for HTTPS destinations, following the alias flag.
    pub fn https_endpoint(&self) -> Option<&ProxyEndpoint> {
        if self.use_http_for_https {
            self.http.as_ref()
        } else {
            self.https.as_ref()
        }
    }
}

fn serialize_bypass<S: Serializer>(bypass: &BypassList, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(bypass.rules().iter().map(|r| r.as_str()))
}

/// Daemon settings, loaded from TOML.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Where the routing payload lives and how it is watched.
    pub payload: PayloadSettings,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Payload file settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PayloadSettings {
    /// Path to the JSON configuration payload.
    pub path: String,

    /// Reload the payload when the file changes.
    pub watch: bool,

    /// Poll interval for the file watcher in seconds.
    pub poll_interval_secs: u64,
}

impl Default for PayloadSettings {
    fn default() -> Self {
        Self {
            path: "proxy-payload.json".to_string(),
            watch: true,
            poll_interval_secs: 2,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
