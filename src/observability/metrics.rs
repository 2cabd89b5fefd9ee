//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_router_decisions_total` (counter): verdicts by `verdict` and `reason`
//! - `proxy_router_reloads_total` (counter): payload reloads by `result`
//! - `proxy_router_config_generation` (gauge): generation of the live snapshot
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Label values are static strings; no per-host cardinality

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Why a verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    Disabled,
    InvalidUrl,
    NoHost,
    Bypassed,
    NoEndpoint,
    Proxied,
}

impl DecisionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::InvalidUrl => "invalid_url",
            Self::NoHost => "no_host",
            Self::Bypassed => "bypassed",
            Self::NoEndpoint => "no_endpoint",
            Self::Proxied => "proxied",
        }
    }
}

/// Install the Prometheus exporter on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one routing decision.
pub fn record_decision(reason: DecisionReason) {
    let verdict = if reason == DecisionReason::Proxied {
        "proxy"
    } else {
        "direct"
    };
    metrics::counter!(
        "proxy_router_decisions_total",
        "verdict" => verdict,
        "reason" => reason.as_str()
    )
    .increment(1);
}

/// Record a payload reload attempt.
pub fn record_reload(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::counter!("proxy_router_reloads_total", "result" => result).increment(1);
}

/// Publish the generation of the live snapshot.
pub fn record_generation(generation: u64) {
    metrics::gauge!("proxy_router_config_generation").set(generation as f64);
}
