use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use proxy_router::bypass::normalize::user_rules;
use proxy_router::config::loader::{load_payload, write_payload};
use proxy_router::config::{default_payload, LogFormat, ObservabilityConfig};
use proxy_router::observability::logging;
use proxy_router::routing::route;

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Inspect proxy routing decisions for a payload file", long_about = None)]
struct Cli {
    /// Log level for diagnostics on stderr.
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the verdict for each URL
    Route {
        #[arg(short, long)]
        payload: PathBuf,
        urls: Vec<String>,
    },
    /// Print the hydrated configuration
    Show {
        #[arg(short, long)]
        payload: PathBuf,
    },
    /// Write the install-time default payload
    Init {
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&ObservabilityConfig {
        log_level: cli.log_level.clone(),
        log_format: LogFormat::Pretty,
        ..Default::default()
    });

    match cli.command {
        Commands::Route { payload, urls } => {
            let config = load_payload(&payload)?;
            for url in urls {
                let verdict = route(&config, &url);
                println!("{}\t{}", url, serde_json::to_string(&verdict.hops())?);
            }
        }
        Commands::Show { payload } => {
            let config = load_payload(&payload)?;
            let summary = json!({
                "config": &config,
                "https_endpoint": config.https_endpoint(),
                "user_rules": user_rules(&config.bypass.to_strings()),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Init { path, force } => {
            if path.exists() && !force {
                eprintln!("Error: {} already exists (use --force to overwrite)", path.display());
                std::process::exit(1);
            }
            write_payload(&path, &default_payload())?;
            println!("Wrote default payload to {}", path.display());
        }
    }

    Ok(())
}
