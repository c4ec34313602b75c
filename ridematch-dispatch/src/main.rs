//! ridematch-dispatch - Ride dispatch matching service
//!
//! Serves the internal matching trigger, reservation release and the chair
//! and user notification streams. Matching passes normally come from an
//! external scheduler; `--match-interval-ms` runs them in-process instead.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ridematch_common::config::resolve_data_folder;
use ridematch_common::db::init_database;
use ridematch_dispatch::config::{Config, FileConfig};
use ridematch_dispatch::db::SqliteDispatchStore;
use ridematch_dispatch::matching::MatchingEngine;
use ridematch_dispatch::notify::SseNotifier;
use ridematch_dispatch::reservation::ReservationTracker;
use ridematch_dispatch::{build_router, AppState, NOTIFICATION_CAPACITY};

const DB_FILE_NAME: &str = "ridematch.db";

/// Command-line arguments for ridematch-dispatch
#[derive(Parser, Debug)]
#[command(name = "ridematch-dispatch")]
#[command(about = "Periodic ride dispatch matching service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "RIDEMATCH_PORT")]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// SQLite database file (defaults to ridematch.db in the data folder)
    #[arg(long, env = "RIDEMATCH_DB")]
    db_path: Option<PathBuf>,

    /// TOML file with a [matching] table
    #[arg(short, long, env = "RIDEMATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Run a matching pass every N milliseconds; 0 disables
    #[arg(long, default_value = "0")]
    match_interval_ms: u64,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let file = FileConfig::load(self.config.as_deref())
            .context("Failed to load configuration file")?;

        let db_path = match self.db_path {
            Some(path) => path,
            None => resolve_data_folder(None, "RIDEMATCH_DATA").join(DB_FILE_NAME),
        };

        Ok(Config {
            bind_addr: format!("{}:{}", self.bind, self.port),
            db_path,
            match_interval: (self.match_interval_ms > 0)
                .then(|| Duration::from_millis(self.match_interval_ms)),
            matching: file.matching,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridematch_dispatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting ridematch-dispatch v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Args::parse().into_config()?;
    info!("Database path: {}", config.db_path.display());
    info!(
        "Matching: max pickup distance {}, starvation after {}s, chunk size {}, cap {}",
        config.matching.max_pickup_distance,
        config.matching.starvation_age_secs,
        config.matching.chunk_size,
        config.matching.max_matches_per_pass
    );

    let pool = init_database(&config.db_path)
        .await
        .context("Failed to initialize database")?;

    let notifier = SseNotifier::new(NOTIFICATION_CAPACITY);
    let engine = Arc::new(MatchingEngine::new(
        Arc::new(SqliteDispatchStore::new(pool)),
        Arc::new(ReservationTracker::new()),
        Arc::new(notifier.clone()),
        config.matching.clone(),
    ));

    engine
        .hydrate_reservations()
        .await
        .context("Failed to load active rides into the reservation tracker")?;

    if let Some(period) = config.match_interval {
        spawn_ticker(Arc::clone(&engine), period);
    }

    let app = build_router(AppState::new(engine, notifier));

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_addr))?;

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Fire a pass every `period`; each pass runs in its own task so a slow one
/// never delays the next tick.
fn spawn_ticker(engine: Arc<MatchingEngine>, period: Duration) {
    info!("In-process matching every {:?}", period);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                if let Err(e) = engine.run_pass().await {
                    error!("Scheduled matching pass failed: {}", e);
                }
            });
        }
    });
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
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
