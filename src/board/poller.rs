//! Multi-source poller.
//!
//! Fans out to every source concurrently, each under its own timeout,
//! normalizes and merges whatever came back, and publishes the result as
//! one `BoardSnapshot`. A slow or failing source only blanks its own
//! column. Polls are numbered; a poll that finishes after a newer one has
//! been published is discarded.

use chrono::Utc;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{merge_quotes, normalize_rows, MergeConfig};
use crate::config::{AppConfig, SourceKind};
use crate::drift::{shift_line, shift_moneyline, SharedDrift, Shift};
use crate::names::SharedStandardizer;
use crate::sources::{QuoteSource, SimulatedBook};
use crate::types::{BoardSnapshot, OddsboardError, RawRow, SourceId, SourceReport, SourceStatus};

/// Latest published snapshot, shared with the read API.
pub type SharedBoard = Arc<RwLock<BoardSnapshot>>;

pub struct Poller {
    sources: Vec<Arc<dyn QuoteSource>>,
    merge: MergeConfig,
    names: SharedStandardizer,
    drift: SharedDrift,
    timeout: Duration,
    book: Arc<SimulatedBook>,
    /// Columns filled from `book` when their source yields nothing.
    fallback: HashSet<SourceId>,
    /// Columns that are synthetic by nature and therefore drift.
    simulated: HashSet<SourceId>,
    board: SharedBoard,
    generation: AtomicU64,
}

/// One source's contribution to a poll.
struct Fetched {
    source_id: SourceId,
    status: SourceStatus,
    rows: Vec<RawRow>,
}

impl Poller {
    pub fn new(
        sources: Vec<Arc<dyn QuoteSource>>,
        merge: MergeConfig,
        names: SharedStandardizer,
        drift: SharedDrift,
        timeout: Duration,
    ) -> Self {
        Self {
            sources,
            merge,
            names,
            drift,
            timeout,
            book: Arc::new(SimulatedBook::default()),
            fallback: HashSet::new(),
            simulated: HashSet::new(),
            board: Arc::new(RwLock::new(BoardSnapshot::empty())),
            generation: AtomicU64::new(0),
        }
    }

    /// Poller over `sources` with columns, timeout, fallback and simulated
    /// columns taken from `config`.
    pub fn from_config(
        config: &AppConfig,
        sources: Vec<Arc<dyn QuoteSource>>,
        book: Arc<SimulatedBook>,
        names: SharedStandardizer,
        drift: SharedDrift,
    ) -> Self {
        let merge = MergeConfig::from_config(&config.board, config.source_ids());
        let fallback: Vec<SourceId> = config
            .sources
            .iter()
            .filter(|s| s.fallback)
            .map(|s| s.id.clone())
            .collect();
        for id in fallback.iter().filter(|id| !book.covers(id)) {
            warn!(source = %id, "Fallback column has no baseline rows and will stay empty");
        }
        let simulated = config
            .sources
            .iter()
            .filter(|s| s.kind == SourceKind::Simulated)
            .map(|s| s.id.clone());

        Self::new(sources, merge, names, drift, config.board.source_timeout())
            .with_fallback(book, fallback)
            .with_simulated_columns(simulated)
    }

    /// Fill the `fallback` columns from `book` when they come back empty.
    pub fn with_fallback(
        mut self,
        book: Arc<SimulatedBook>,
        fallback: impl IntoIterator<Item = SourceId>,
    ) -> Self {
        self.book = book;
        self.fallback = fallback.into_iter().collect();
        self
    }

    /// Mark columns whose every quote is synthetic.
    pub fn with_simulated_columns(mut self, columns: impl IntoIterator<Item = SourceId>) -> Self {
        self.simulated = columns.into_iter().collect();
        self
    }

    pub fn board(&self) -> SharedBoard {
        Arc::clone(&self.board)
    }

    // -- Single poll -----------------------------------------------------

    /// Run one poll cycle without publishing it.
    pub async fn poll_once(&self) -> BoardSnapshot {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let started_at = Utc::now();
        debug!(generation, sources = self.sources.len(), "Starting poll");

        let mut fetched = join_all(self.sources.iter().map(|s| self.fetch_source(s))).await;

        // Configured columns with no adapter still get a report (and may be
        // filled from the baseline).
        let fed: HashSet<&SourceId> = fetched.iter().map(|f| &f.source_id).collect();
        let unfed: Vec<Fetched> = self
            .merge
            .sources
            .iter()
            .filter(|id| !fed.contains(id))
            .map(|id| Fetched {
                source_id: id.clone(),
                status: SourceStatus::Unfed,
                rows: Vec::new(),
            })
            .collect();
        fetched.extend(unfed);

        let mut raw_rows = Vec::new();
        let mut synthetic = Vec::new();
        let mut source_reports = Vec::with_capacity(fetched.len());

        for Fetched { source_id, status, mut rows } in fetched {
            let mut simulated = self.simulated.contains(&source_id);
            if rows.is_empty() && self.fallback.contains(&source_id) {
                rows = self.book.rows_for(&source_id, generation);
                if !rows.is_empty() {
                    simulated = true;
                    debug!(source = %source_id, ?status, rows = rows.len(), "Column filled from baseline");
                }
            }

            source_reports.push(SourceReport {
                source_id: source_id.clone(),
                status,
                rows: rows.len(),
                simulated,
            });
            for mut row in rows {
                row.source_id = source_id.clone();
                raw_rows.push(row);
                synthetic.push(simulated);
            }
        }

        let mut quotes = {
            let names = self.names.read().await;
            normalize_rows(&raw_rows, &names)
        };

        // Synthetic prices and lines for live entities move with the drift table.
        {
            let drift = self.drift.read().await;
            if drift.live_count() > 0 {
                for (quote, _) in quotes.iter_mut().zip(&synthetic).filter(|(_, s)| **s) {
                    let step = drift.shift_for(&quote.outcome_key.entity);
                    if step == Shift::ZERO {
                        continue;
                    }
                    quote.price = quote.price.map(|p| shift_moneyline(p, step.ml_shift));
                    quote.line_value = quote
                        .line_value
                        .as_ref()
                        .map(|line| shift_line(line, &quote.outcome_key.market, step));
                }
            }
        }

        let rows = merge_quotes(&quotes, &self.merge);

        BoardSnapshot {
            generation,
            started_at,
            completed_at: Utc::now(),
            rows,
            source_reports,
        }
    }

    async fn fetch_source(&self, source: &Arc<dyn QuoteSource>) -> Fetched {
        let source_id = source.id().clone();
        let (status, rows) = match tokio::time::timeout(self.timeout, source.fetch()).await {
            Ok(Ok(rows)) if rows.is_empty() => (SourceStatus::Empty, rows),
            Ok(Ok(rows)) => (SourceStatus::Ok, rows),
            Ok(Err(e)) => {
                warn!(source = %source_id, error = %e, "Source fetch failed, continuing without");
                (SourceStatus::Failed, Vec::new())
            }
            Err(_) => {
                let err = OddsboardError::SourceTimeout {
                    source_id: source_id.to_string(),
                    timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                };
                warn!(source = %source_id, error = %err, "Source timed out, continuing without");
                (SourceStatus::TimedOut, Vec::new())
            }
        };
        Fetched {
            source_id,
            status,
            rows,
        }
    }

    // -- Publishing ------------------------------------------------------

    /// Publish `snapshot` unless a newer generation is already out.
    pub async fn publish(&self, snapshot: BoardSnapshot) -> bool {
        let mut board = self.board.write().await;
        if snapshot.generation <= board.generation {
            info!(
                generation = snapshot.generation,
                published = board.generation,
                "Discarding stale poll result"
            );
            return false;
        }

        let failed = snapshot
            .source_reports
            .iter()
            .filter(|r| matches!(r.status, SourceStatus::Failed | SourceStatus::TimedOut))
            .count();
        info!(
            generation = snapshot.generation,
            rows = snapshot.rows.len(),
            sources = snapshot.source_reports.len(),
            failed,
            elapsed_ms = (snapshot.completed_at - snapshot.started_at).num_milliseconds(),
            "Board refreshed"
        );
        *board = snapshot;
        true
    }

    /// Poll and publish. Returns whether the result was published.
    pub async fn refresh(&self) -> bool {
        let snapshot = self.poll_once().await;
        self.publish(snapshot).await
    }

    // -- Background loop -------------------------------------------------

    /// Poll every `interval` on a background task.
    ///
    /// Each tick starts its own poll, so a slow source never delays the
    /// schedule; overlapping polls are reconciled by generation.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> PollerHandle {
        let (pause_tx, pause_rx) = watch::channel(false);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let board = self.board();

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_secs = interval.as_secs_f64(), "Poller started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if *pause_rx.borrow() {
                            debug!("Poller paused, skipping tick");
                            continue;
                        }
                        let poller = Arc::clone(&self);
                        tokio::spawn(async move {
                            poller.refresh().await;
                        });
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!("Poller stopped");
                            break;
                        }
                    }
                }
            }
        });

        PollerHandle {
            pause_tx,
            shutdown_tx,
            join,
            board,
        }
    }
}

/// Control handle for a running poller.
pub struct PollerHandle {
    pause_tx: watch::Sender<bool>,
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
    board: SharedBoard,
}

impl PollerHandle {
    /// Stop starting new polls. In-flight polls still complete.
    pub fn pause(&self) {
        self.pause_tx.send_replace(true);
        info!("Poller paused");
    }

    pub fn resume(&self) {
        self.pause_tx.send_replace(false);
        info!("Poller resumed");
    }

    pub fn is_paused(&self) -> bool {
        *self.pause_tx.borrow()
    }

    pub fn board(&self) -> SharedBoard {
        Arc::clone(&self.board)
    }

    /// Stop the loop and wait for it to exit.
    pub async fn stop(self) {
        self.shutdown_tx.send_replace(true);
        if let Err(e) = self.join.await {
            warn!(error = %e, "Poller task ended abnormally");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
