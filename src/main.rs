//! proxy-router daemon.
//!
//! Reads destination URLs from stdin, one per line, and writes the routing
//! verdict for each as a JSON line on stdout. The payload file is watched
//! and re-hydrated on change; SIGHUP forces a re-read.
//!
//! ```text
//!   stdin (URL per line)
//!        │
//!        ▼
//!  ┌──────────────┐   load()   ┌──────────────────┐
//!  │   router     │──────────▶│  RoutingState     │◀── swap ── watcher / SIGHUP
//!  │ route(url)   │           │ ArcSwap<snapshot> │            (payload.json)
//!  └──────┬───────┘           └──────────────────┘
//!         │
//!         ▼
//!   stdout: [{"type":"http","host":..,"port":..},{"type":"direct"}]
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use proxy_router::config::loader::{load_payload, load_settings};
use proxy_router::config::watcher::ConfigWatcher;
use proxy_router::config::{hydrate, Settings};
use proxy_router::lifecycle::{spawn_signal_handler, Shutdown};
use proxy_router::observability::{logging, metrics};
use proxy_router::routing::RoutingState;

#[derive(Parser)]
#[command(name = "proxy-router")]
#[command(about = "Route destination URLs read from stdin through the configured proxy", long_about = None)]
struct Args {
    /// Daemon settings file (TOML).
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Payload file (JSON); overrides `payload.path` from the settings.
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Do not watch the payload file for changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    if let Some(path) = &args.payload {
        settings.payload.path = path.display().to_string();
    }
    if args.no_watch {
        settings.payload.watch = false;
    }

    logging::init_logging(&settings.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "proxy-router starting");

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let payload_path = PathBuf::from(&settings.payload.path);
    let initial = match load_payload(&payload_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = ?payload_path, error = %e, "Cannot read payload, starting with proxying disabled");
            hydrate(&Value::Null)
        }
    };
    let state = Arc::new(RoutingState::new(initial));

    let (watcher, mut updates) = ConfigWatcher::new(
        &payload_path,
        Duration::from_secs(settings.payload.poll_interval_secs),
    );
    let _watcher = if settings.payload.watch {
        match watcher.run() {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::warn!(error = %e, "Payload watcher unavailable, hot reload disabled");
                None
            }
        }
    } else {
        None
    };

    let shutdown = Arc::new(Shutdown::new());
    let (reload_tx, mut reload_rx) = mpsc::unbounded_channel();
    spawn_signal_handler(shutdown.clone(), reload_tx);
    let mut shutdown_rx = shutdown.subscribe();

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            Some(config) = updates.recv() => {
                state.replace(config);
            }
            Some(()) = reload_rx.recv() => match load_payload(&payload_path) {
                Ok(config) => {
                    state.replace(config);
                }
                Err(e) => tracing::error!(error = %e, "Reload failed, keeping current configuration"),
            },
            // `buf` keeps bytes from a read cut short by another branch.
            read = stdin.read_until(b'\n', &mut buf) => {
                let closed = read? == 0;
                if let Some(out) = state.answer_line(&buf)? {
                    stdout.write_all(&out).await?;
                    stdout.flush().await?;
                }
                buf.clear();
                if closed {
                    tracing::info!("Input closed");
                    break;
                }
            }
        }
    }

    tracing::info!(
        generation = state.generation(),
        signalled = shutdown.is_triggered(),
        "Shutdown complete"
    );
    Ok(())
}
