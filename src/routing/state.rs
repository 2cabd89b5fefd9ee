//! Live routing state.
//!
//! # Responsibilities
//! - Hold the current [`RoutingConfig`] snapshot
//! - Swap in new snapshots atomically
//! - Stamp each snapshot with a generation
//!
//! # Design Decisions
//! - `ArcSwap` gives lock-free reads; a decision never blocks on a reload
//! - Writers are serialized, so the live generation never goes backwards
//! - A snapshot is replaced whole, never patched field by field
//! - In-flight decisions keep the snapshot they loaded until they finish

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use serde_json::Value;

use crate::config::{hydrate, RoutingConfig};
use crate::observability::metrics;
use crate::routing::router::route;
use crate::routing::verdict::RoutingVerdict;

/// Shared handle to the current routing snapshot.
#[derive(Debug)]
pub struct RoutingState {
    current: ArcSwap<RoutingConfig>,
    /// Last generation handed out; held while storing.
    writer: Mutex<u64>,
}

impl RoutingState {
    /// Create state holding `config` as generation 1.
    pub fn new(config: RoutingConfig) -> Self {
        let state = Self {
            current: ArcSwap::from_pointee(RoutingConfig::default()),
            writer: Mutex::new(0),
        };
        state.replace(config);
        state
    }

    /// Create state from a raw payload.
    pub fn from_payload(payload: &Value) -> Self {
        Self::new(hydrate(payload))
    }

    /// The current snapshot. Holding it keeps that snapshot alive.
    pub fn snapshot(&self) -> Arc<RoutingConfig> {
        self.current.load_full()
    }

    /// Swap in a new snapshot and return its generation.
    pub fn replace(&self, mut config: RoutingConfig) -> u64 {
        let mut last = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        *last += 1;
        let generation = *last;
        config.generation = generation;

        tracing::info!(
            generation,
            enabled = config.enabled,
            bypass_rules = config.bypass.len(),
            "Routing config swapped"
        );
        self.current.store(Arc::new(config));
        metrics::record_generation(generation);
        generation
    }

    /// Re-hydrate from a payload and swap it in.
    pub fn apply(&self, payload: &Value) -> u64 {
        self.replace(hydrate(payload))
    }

    /// Route against the current snapshot.
    pub fn route(&self, url: &str) -> RoutingVerdict {
        route(&self.current.load(), url)
    }

    /// Answer one raw input line with its JSON verdict line.
    ///
    /// Blank lines yield `None`. Lines that are not UTF-8 are answered
    /// `Direct` so every request still gets exactly one verdict.
    pub fn answer_line(&self, raw: &[u8]) -> serde_json::Result<Option<Vec<u8>>> {
        let verdict = match std::str::from_utf8(raw) {
            Ok(line) => {
                let url = line.trim();
                if url.is_empty() {
                    return Ok(None);
                }
                self.route(url)
            }
            Err(e) => {
                tracing::warn!(
                    line = %String::from_utf8_lossy(raw).trim(),
                    error = %e,
                    "Undecodable destination, going direct"
                );
                RoutingVerdict::Direct
            }
        };

        let mut out = serde_json::to_vec(&verdict.hops())?;
        out.push(b'\n');
        Ok(Some(out))
    }

    /// Generation of the live snapshot.
    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }
}

impl Default for RoutingState {
    fn default() -> Self {
        Self::from_payload(&Value::Null)
    }
}
