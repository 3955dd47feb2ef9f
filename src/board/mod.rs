//! Cross-source comparison board.
//!
//! Quotes sharing an outcome key are merged into one `ComparisonRow`.
//! Best price is the numerically highest signed American price, which
//! ranks favourites and underdogs alike (+130 beats +110, -105 beats
//! -120). Edge is the gap between the best and second-best price.
//!
//! Rows are recomputed from scratch for every snapshot.

pub mod normalize;
pub mod poller;

use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::config::BoardConfig;
use crate::types::{ComparisonRow, LineValue, OutcomeKey, PriceQuote, SourceId, Tier};

pub use normalize::{normalize_rows, parse_price};
pub use poller::{Poller, PollerHandle, SharedBoard};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Board columns. Every row carries a (possibly null) entry for each.
    pub sources: Vec<SourceId>,
    /// Edge at which a row is promoted to premium.
    pub premium_edge: i32,
    /// Outcomes that are always premium.
    pub premium_outcomes: HashSet<OutcomeKey>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            premium_edge: 10,
            premium_outcomes: HashSet::new(),
        }
    }
}

impl MergeConfig {
    pub fn from_config(board: &BoardConfig, sources: Vec<SourceId>) -> Self {
        let premium_outcomes = board
            .premium_outcomes
            .iter()
            .filter_map(|s| parse_outcome_key(s))
            .collect();
        Self {
            sources,
            premium_edge: board.premium_edge,
            premium_outcomes,
        }
    }
}

/// Parse `"<entity> | <market>"` into a key. The entity must already be
/// canonical.
pub fn parse_outcome_key(s: &str) -> Option<OutcomeKey> {
    let (entity, market) = s.split_once('|')?;
    let entity = entity.trim();
    if entity.is_empty() {
        return None;
    }
    Some(OutcomeKey::new(entity, market))
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Best source, best price and edge over the next-best price.
///
/// Ties on price go to the lexicographically smaller source id.
pub fn rank_prices(
    prices: &BTreeMap<SourceId, Option<i32>>,
) -> (Option<SourceId>, Option<i32>, i32) {
    let mut priced: Vec<(&SourceId, i32)> = prices
        .iter()
        .filter_map(|(source, price)| price.map(|p| (source, p)))
        .collect();
    priced.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    match priced.as_slice() {
        [] => (None, None, 0),
        [(source, best)] => (Some((*source).clone()), Some(*best), 0),
        // best >= second; saturates at i32::MAX.
        [(source, best), (_, second), ..] => (
            Some((*source).clone()),
            Some(*best),
            best.saturating_sub(*second),
        ),
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge one snapshot's quotes into rows sorted by outcome key.
///
/// A source that quotes the same outcome twice keeps its last quote.
pub fn merge_quotes(quotes: &[PriceQuote], config: &MergeConfig) -> Vec<ComparisonRow> {
    let mut grouped: BTreeMap<&OutcomeKey, BTreeMap<&SourceId, &PriceQuote>> = BTreeMap::new();
    for quote in quotes {
        let by_source = grouped.entry(&quote.outcome_key).or_default();
        if by_source.insert(&quote.source_id, quote).is_some() {
            debug!(
                source = %quote.source_id,
                outcome = %quote.outcome_key,
                "Duplicate quote, keeping the last one"
            );
        }
    }

    grouped
        .into_iter()
        .map(|(key, by_source)| {
            let mut per_source_price: BTreeMap<SourceId, Option<i32>> =
                config.sources.iter().map(|s| (s.clone(), None)).collect();
            let mut per_source_line: BTreeMap<SourceId, LineValue> = BTreeMap::new();

            for (source, quote) in by_source {
                per_source_price.insert(source.clone(), quote.price);
                if let Some(line) = &quote.line_value {
                    per_source_line.insert(source.clone(), line.clone());
                }
            }

            build_row(key.clone(), per_source_price, per_source_line, config)
        })
        .collect()
}

fn build_row(
    outcome_key: OutcomeKey,
    per_source_price: BTreeMap<SourceId, Option<i32>>,
    per_source_line: BTreeMap<SourceId, LineValue>,
    config: &MergeConfig,
) -> ComparisonRow {
    let (best_source_id, best_price, edge) = rank_prices(&per_source_price);
    let tier = if (best_price.is_some() && edge >= config.premium_edge)
        || config.premium_outcomes.contains(&outcome_key)
    {
        Tier::Premium
    } else {
        Tier::Standard
    };

    ComparisonRow {
        outcome_key,
        per_source_price,
        per_source_line,
        best_source_id,
        best_price,
        edge,
        tier,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
