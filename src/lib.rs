//! Per-request proxy routing: bypass rules and direct-or-proxy verdicts.

pub mod bypass;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use bypass::{BypassList, BypassRule, Destination};
pub use config::{hydrate, ProxyEndpoint, RoutingConfig};
pub use routing::{route, RoutingState, RoutingVerdict};
