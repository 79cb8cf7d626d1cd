//! Cluster reroute service.
//!
//! # Architecture Overview
//!
//! ```text
//!     POST /_cluster/reroute
//!     ─────────────────────────▶ http ──▶ reroute::ClusterService ──▶ allocation
//!                                 │               │                  commands
//!                                 │               ▼
//!                                 │        ArcSwap<ClusterState>
//!                                 ▼
//!     JSON + Warning headers ◀── ClusterRerouteResponse::render_mode
//! ```

use std::path::PathBuf;

use clap::Parser;

use cluster_reroute::config::{load_config, ServiceConfig};
use cluster_reroute::lifecycle::{self, signals};
use cluster_reroute::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "cluster-reroute")]
#[command(about = "Cluster reroute API service", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when absent.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cluster-reroute starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        auth = config.admin.api_key.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let service = lifecycle::start(&config).await?;
    tracing::info!(address = %service.local_addr, "Listening for connections");

    signals::spawn_signal_handler(service.shutdown_handle());
    service.wait().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
