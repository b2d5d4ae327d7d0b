use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use server::AppState;
use server::database::SqliteStore;
use server::scoring::HttpScoringPeer;
use shared::config::load_config;

#[derive(Debug, Parser)]
#[command(name = "sentinel-server", version, about)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long, env = "SENTINEL_CONFIG", default_value = "config.toml")]
    config: String,

    /// Override `database.path` (`:memory:` for a throwaway store).
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(path) = cli.database {
        config.database.path = path;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = SqliteStore::open(&config.database.path)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path))?;
    let peer = HttpScoringPeer::new(&config.scoring).context("Failed to build scoring client")?;
    info!("Scoring service at {}", peer.endpoint());

    let addr = config.server.addr();
    let state = AppState::new(config, Arc::new(store), Arc::new(peer))?;

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tokio::select! {
        result = server::server::serve(listener, state) => {
            if let Err(e) = &result {
                error!("Server stopped: {:#}", e);
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping");
            Ok(())
        }
    }
}
