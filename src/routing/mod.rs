//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming destination URL
//!     → state.rs (load current snapshot, lock-free)
//!     → router.rs (enabled? parse host, bypass? pick endpoint)
//!     → verdict.rs (Direct | Proxy[targets] + implicit direct fallback)
//!
//! Config update:
//!     payload → hydrate → RoutingState::replace (single atomic swap)
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable; readers never see a half-applied update
//! - Deterministic: same snapshot and URL always give the same verdict
//! - Fail open to direct connectivity

pub mod router;
pub mod state;
pub mod verdict;

pub use router::{is_bypassed, route};
pub use state::RoutingState;
pub use verdict::{Hop, ProxyKind, ProxyTarget, RoutingVerdict};
