//! Route catalog service.
//!
//! # Architecture Overview
//!
//! ```text
//!     captured exchange / HAR log
//!  ───────────────▶ ┌─────────┐    ┌──────────┐    ┌──────────────┐
//!                   │  http   │───▶│ capture  │───▶│   catalog    │
//!                   │ server  │    │ sanitize │    │ RouteStore   │
//!                   └─────────┘    └──────────┘    └──────┬───────┘
//!                                                         │
//!                          ┌──────────────┬───────────────┼──────────────┐
//!                          ▼              ▼               ▼              ▼
//!                    ┌──────────┐   ┌──────────┐   ┌────────────┐  ┌──────────┐
//!                    │ routing  │   │  schema  │   │  snapshot  │  │ openapi  │
//!                    │ patterns │   │ widening │   │ export/imp │  │ document │
//!                    └──────────┘   └──────────┘   └────────────┘  └──────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use route_catalog::config::{load_config, CatalogConfig};
use route_catalog::http::{open_store, CatalogServer};
use route_catalog::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "route-catalog")]
#[command(about = "Learns templated API routes from captured HTTP traffic", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CatalogConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("route-catalog v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        snapshot_path = ?config.persistence.snapshot_path,
        auth = config.admin.api_key.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let store = open_store(&config);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = CatalogServer::new(config, store);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
