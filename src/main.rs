//! oddsboard: cross-source wager odds comparison board.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the sources, name table and drift table, then runs the poller,
//! drift ticker and read API until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use oddsboard::api::{self, AppState};
use oddsboard::board::Poller;
use oddsboard::config::AppConfig;
use oddsboard::drift::{spawn_ticker, DriftScheduler};
use oddsboard::names::NameStandardizer;
use oddsboard::sources::{build_sources, SimulatedBook};
use oddsboard::types::EventStatus;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load_default()?;
    init_logging();

    info!(
        sources = cfg.sources.len(),
        poll_interval_secs = cfg.board.poll_interval_secs,
        source_timeout_ms = cfg.board.source_timeout_ms,
        baseline_rows = cfg.simulation.baseline.len(),
        "oddsboard starting up"
    );

    // -- Initialise components -------------------------------------------

    let names = NameStandardizer::from_config(&cfg.names).into_shared();

    let mut drift = DriftScheduler::new();
    for entity in &cfg.drift.live_entities {
        let canonical = names.read().await.clean_name(entity);
        drift.set_status(&canonical, EventStatus::Live);
    }
    let drift = drift.into_shared();

    let book = Arc::new(SimulatedBook::from_config(&cfg.simulation));
    let sources = build_sources(&cfg, &book)?;
    if sources.is_empty() && book.is_empty() {
        warn!("No sources and no simulation baseline configured; the board will stay empty");
    }

    let poller = Arc::new(Poller::from_config(
        &cfg,
        sources,
        Arc::clone(&book),
        Arc::clone(&names),
        Arc::clone(&drift),
    ));

    // -- Background tasks ------------------------------------------------

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = spawn_ticker(Arc::clone(&drift), cfg.drift.cadence(), shutdown_rx);
    let handle = Arc::clone(&poller).spawn(cfg.board.poll_interval());

    let server = if cfg.api.enabled {
        let state = AppState {
            board: handle.board(),
            names: Arc::clone(&names),
            drift: Arc::clone(&drift),
        };
        Some(api::spawn_api(state, cfg.api.port).await?)
    } else {
        info!("Read API disabled");
        None
    };

    info!("Running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received.");

    // -- Shutdown --------------------------------------------------------

    handle.stop().await;
    shutdown_tx.send_replace(true);
    if let Err(e) = ticker.await {
        warn!(error = %e, "Drift ticker ended abnormally");
    }
    if let Some(server) = server {
        server.abort();
    }

    let generation = poller.board().read().await.generation;
    info!(generation, "oddsboard shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("oddsboard=info"));

    let json_logging = std::env::var("ODDSBOARD_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
