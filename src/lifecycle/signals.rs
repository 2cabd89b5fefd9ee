//! OS signal handling.
//!
//! # Responsibilities
//! - Listen for SIGTERM, SIGINT and SIGHUP
//! - Translate them into shutdown or reload events
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Non-unix targets only get Ctrl-C

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::lifecycle::shutdown::Shutdown;

/// What a received signal asks the daemon to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Shutdown,
    Reload,
}

#[cfg(unix)]
async fn next_signal() -> std::io::Result<Signal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    let mut hup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => Ok(Signal::Shutdown),
        _ = term.recv() => Ok(Signal::Shutdown),
        _ = hup.recv() => Ok(Signal::Reload),
    }
}

#[cfg(not(unix))]
async fn next_signal() -> std::io::Result<Signal> {
    tokio::signal::ctrl_c().await?;
    Ok(Signal::Shutdown)
}

/// Spawn a task forwarding reload signals to `reload_tx` and triggering
/// `shutdown` on termination signals.
pub fn spawn_signal_handler(shutdown: Arc<Shutdown>, reload_tx: mpsc::UnboundedSender<()>) {
    tokio::spawn(async move {
        loop {
            match next_signal().await {
                Ok(Signal::Reload) => {
                    tracing::info!("SIGHUP received, reloading payload");
                    if reload_tx.send(()).is_err() {
                        break;
                    }
                }
                Ok(Signal::Shutdown) => {
                    tracing::info!("Shutdown signal received");
                    shutdown.trigger();
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install signal handlers");
                    break;
                }
            }
        }
    });
}
