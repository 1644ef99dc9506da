//! deciframe-api - Song similarity service
//!
//! Serves `GET /similares` over the SQLite chord catalog.
//!
//! Configuration priority: command line > environment > TOML file > defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use deciframe_api::cache::MemoryCache;
use deciframe_api::db::SqliteSongStore;
use deciframe_api::{build_router, AppState};
use deciframe_common::config::TomlConfig;
use deciframe_common::db::init_database;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired cache pages are swept
const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Command-line arguments for deciframe-api
#[derive(Parser, Debug)]
#[command(name = "deciframe-api")]
#[command(about = "Song similarity service over a chord catalog")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "DECIFRAME_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// SQLite catalog database (overrides the config file)
    #[arg(short, long, env = "DECIFRAME_DATABASE")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deciframe_api=info,deciframe_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting deciframe-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    let port = args.port.unwrap_or(config.port);
    let db_path = args
        .database
        .clone()
        .unwrap_or_else(|| config.database_path_or_default());

    info!("Database path: {}", db_path.display());
    let pool = match init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e).context("Failed to open catalog database");
        }
    };

    let cache = Arc::new(MemoryCache::new());
    spawn_cache_sweeper(Arc::clone(&cache));

    let state = AppState::from_config(&config, Arc::new(SqliteSongStore::new(pool)), cache);
    info!(
        "Search admission gate: {} slots, cache TTL {}s",
        state.service.governor().capacity(),
        config.cache_ttl_secs
    );

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("deciframe-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Periodically drop expired pages so the map does not grow without bound
fn spawn_cache_sweeper(cache: Arc<MemoryCache>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = cache.purge_expired().await;
            if removed > 0 {
                info!("Purged {} expired cache pages", removed);
            }
        }
    });
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
