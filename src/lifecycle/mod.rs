//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal or end of input → broadcast → daemon loop exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Re-read the payload
//! ```
//!
//! # Design Decisions
//! - SIGHUP reloads, it never stops the daemon
//! - Decisions in flight finish on the snapshot they loaded

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::{spawn_signal_handler, Signal};
