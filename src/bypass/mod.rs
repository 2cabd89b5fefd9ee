//! Bypass rule subsystem.
//!
//! # Data Flow
//! ```text
//! bypassList (array | "a,b\nc" | null)
//!     → normalize.rs (canonical strings, defaults merged, deduplicated)
//!     → rule.rs (classify once: loopback | cidr | wildcard | exact | bare domain)
//!     → matcher.rs (BypassList, OR over rules)
//!
//! Per request:
//!     host → Destination (lower-cased, IPv4 parsed via address.rs)
//!     → BypassList::matches
//! ```
//!
//! # Design Decisions
//! - Malformed rules are kept (for display) but never match
//! - IPv4 only; IPv6 hosts are matched by name rules alone

pub mod address;
pub mod matcher;
pub mod normalize;
pub mod rule;

pub use address::AddressError;
pub use matcher::{BypassList, Destination, Matcher};
pub use normalize::{normalize, BypassInput, DEFAULT_BYPASS};
pub use rule::{BypassRule, RuleKind};
