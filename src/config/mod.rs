//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! payload file (JSON, written by the settings UI)
//!     → loader.rs (read & parse)
//!     → hydrate.rs (coerce fields, normalize bypass rules)
//!     → RoutingConfig (immutable snapshot)
//!     → swapped into RoutingState
//!
//! On change:
//!     watcher.rs detects change
//!     → loader.rs re-reads and hydrates
//!     → snapshot sent over a channel
//!     → atomic swap in RoutingState
//!
//! settings file (TOML, daemon only)
//!     → loader.rs → validation.rs → Settings
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable; changes require full re-hydration
//! - All settings fields have defaults to allow minimal files
//! - A payload that fails to parse keeps the previous snapshot

pub mod hydrate;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use hydrate::{default_payload, hydrate};
pub use loader::ConfigError;
pub use schema::{LogFormat, ObservabilityConfig, PayloadSettings, ProxyEndpoint, RoutingConfig, Settings};
