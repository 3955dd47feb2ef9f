//! Simulated baseline book.
//!
//! Generates rows from the configured baseline table with a small,
//! reproducible jitter per poll. Backs `kind = "simulated"` sources and
//! the poller's fallback fill.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::QuoteSource;
use crate::config::{BaselineRow, SimulationConfig};
use crate::drift::{hash, shift_moneyline};
use crate::odds::probability_to_american;
use crate::types::{RawPrice, RawRow, SourceId};

/// Largest jitter, in American points, a book will apply.
pub const MAX_JITTER: i32 = 100;

#[derive(Debug, Clone, Default)]
pub struct SimulatedBook {
    rows: Vec<BaselineRow>,
    jitter: i32,
}

impl SimulatedBook {
    pub fn new(rows: Vec<BaselineRow>, jitter: i32) -> Self {
        Self {
            rows,
            jitter: jitter.clamp(0, MAX_JITTER),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.baseline.clone(), config.jitter)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the baseline has anything at all for `source`.
    pub fn covers(&self, source: &SourceId) -> bool {
        self.rows.iter().any(|row| {
            row.prices.contains_key(source)
                || row.lines.contains_key(source)
                || row.probabilities.contains_key(source)
        })
    }

    /// Jitter offset in `-jitter..=jitter`, fixed for a given
    /// `(source, outcome, generation)`.
    fn offset(&self, source: &SourceId, row: &BaselineRow, generation: u64) -> i32 {
        if self.jitter == 0 {
            return 0;
        }
        let jitter = self.jitter.unsigned_abs();
        let span = 2 * jitter + 1;
        let key = format!("{source}|{}|{}", row.entity, row.market);
        // Remainder is at most 2 * MAX_JITTER.
        (hash(&key, generation) % span) as i32 - self.jitter
    }

    /// Rows `source` would show at poll `generation`.
    pub fn rows_for(&self, source: &SourceId, generation: u64) -> Vec<RawRow> {
        self.rows
            .iter()
            .filter_map(|row| {
                let price = if let Some(&base) = row.prices.get(source) {
                    Some(shift_moneyline(base, self.offset(source, row, generation)))
                } else if let Some(&cents) = row.probabilities.get(source) {
                    let probability = Decimal::from(cents) / Decimal::from(100);
                    probability_to_american(probability).map(|odds| odds.value())
                } else {
                    None
                };
                let line = row
                    .lines
                    .get(source)
                    .cloned()
                    .or_else(|| row.prices.contains_key(source).then(|| row.line.clone()).flatten());

                if price.is_none() && line.is_none() {
                    return None;
                }
                Some(RawRow {
                    source_id: source.clone(),
                    entity: row.entity.clone(),
                    market: row.market.clone(),
                    price: price.map(|p| RawPrice::Number(i64::from(p))),
                    line,
                })
            })
            .collect()
    }
}

/// A source whose whole column comes from the baseline book.
pub struct SimulatedSource {
    id: SourceId,
    book: Arc<SimulatedBook>,
    polls: AtomicU64,
}

impl SimulatedSource {
    pub fn new(id: SourceId, book: Arc<SimulatedBook>) -> Self {
        Self {
            id,
            book,
            polls: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl QuoteSource for SimulatedSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&self) -> Result<Vec<RawRow>> {
        let generation = self.polls.fetch_add(1, Ordering::Relaxed) + 1;
        let rows = self.book.rows_for(&self.id, generation);
        debug!(source = %self.id, generation, rows = rows.len(), "Simulated rows generated");
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
