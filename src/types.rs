//! Shared types for oddsboard.
//!
//! These types form the data model used across all modules. Adapters
//! produce `RawRow`s, the board turns them into `PriceQuote`s and
//! `ComparisonRow`s, and the drift simulator tracks `DriftState`s.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Identifier of a price source ("FanDuel", "DraftKings", "Kalshi", ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Raw adapter rows
// ---------------------------------------------------------------------------

/// A line attached to a quote: a numeric threshold (`25.5`) or free text
/// (`"N/A"`, `"O 8.5"`). Fantasy sources carry only this, no price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for LineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineValue::Number(n) => write!(f, "{n}"),
            LineValue::Text(s) => f.write_str(s),
        }
    }
}

/// A price as it arrives from a feed: either a bare integer or a string
/// such as `"+105"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(i64),
    Text(String),
}

/// One row as returned by a source adapter, before name canonicalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub source_id: SourceId,
    /// Free-text team or player name, exactly as the source spells it.
    pub entity: String,
    /// Market or prop label ("moneyline", "Over 25.5 Points").
    pub market: String,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub line: Option<LineValue>,
}

// ---------------------------------------------------------------------------
// Quotes and comparison rows
// ---------------------------------------------------------------------------

/// Canonical key of a logical outcome. Two quotes merge into the same row
/// iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutcomeKey {
    /// Canonical entity name.
    pub entity: String,
    /// Lowercased, whitespace-collapsed market label.
    pub market: String,
}

impl OutcomeKey {
    /// Build a key from an already-canonical entity and a raw market label.
    pub fn new(entity: impl Into<String>, market: &str) -> Self {
        Self {
            entity: entity.into(),
            market: Self::normalize_market(market),
        }
    }

    /// Trim, lowercase and collapse internal whitespace.
    pub fn normalize_market(market: &str) -> String {
        market
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.entity, self.market)
    }
}

/// One source's quote for one outcome in the current poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub source_id: SourceId,
    pub outcome_key: OutcomeKey,
    /// American odds; `None` when the source had no usable price.
    pub price: Option<i32>,
    pub line_value: Option<LineValue>,
}

/// Display tier of a comparison row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Standard,
    Premium,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Standard => write!(f, "standard"),
            Tier::Premium => write!(f, "premium"),
        }
    }
}

/// Unified cross-source view of one outcome.
///
/// `best_price` is the highest non-null entry of `per_source_price`;
/// `edge` is never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub outcome_key: OutcomeKey,
    pub per_source_price: BTreeMap<SourceId, Option<i32>>,
    pub per_source_line: BTreeMap<SourceId, LineValue>,
    pub best_source_id: Option<SourceId>,
    pub best_price: Option<i32>,
    pub edge: i32,
    pub tier: Tier,
}

impl ComparisonRow {
    /// Number of sources with a non-null price.
    pub fn priced_sources(&self) -> usize {
        self.per_source_price.values().filter(|p| p.is_some()).count()
    }
}

impl fmt::Display for ComparisonRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.best_source_id, self.best_price) {
            (Some(src), Some(price)) => write!(
                f,
                "{} best={}@{:+} edge={} [{}] ({} sources)",
                self.outcome_key,
                src,
                price,
                self.edge,
                self.tier,
                self.priced_sources(),
            ),
            _ => write!(f, "{} no prices [{}]", self.outcome_key, self.tier),
        }
    }
}

// ---------------------------------------------------------------------------
// Bet slip
// ---------------------------------------------------------------------------

/// One leg of a caller-owned parlay ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// American odds as displayed, e.g. `"-110"` or `"+150"`.
    pub price: String,
    #[serde(default)]
    pub stake: Decimal,
}

impl Pick {
    pub fn new(price: impl Into<String>, stake: Decimal) -> Self {
        Self {
            price: price.into(),
            stake,
        }
    }
}

// ---------------------------------------------------------------------------
// Drift
// ---------------------------------------------------------------------------

/// Reported status of the event behind an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pre,
    Live,
    Final,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Pre => write!(f, "pre"),
            EventStatus::Live => write!(f, "live"),
            EventStatus::Final => write!(f, "final"),
        }
    }
}

impl std::str::FromStr for EventStatus {
    type Err = OddsboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pre" | "scheduled" => Ok(EventStatus::Pre),
            "live" | "in" => Ok(EventStatus::Live),
            "final" | "post" => Ok(EventStatus::Final),
            other => Err(OddsboardError::Config(format!("unknown event status: {other}"))),
        }
    }
}

/// Per-entity drift counter. `tick` only moves while `Live`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftState {
    pub entity_id: String,
    pub tick: u64,
    pub event_status: EventStatus,
}

// ---------------------------------------------------------------------------
// Board snapshot
// ---------------------------------------------------------------------------

/// Outcome of one source in one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Ok,
    Empty,
    Failed,
    TimedOut,
    /// No adapter configured for this source.
    Unfed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source_id: SourceId,
    pub status: SourceStatus,
    pub rows: usize,
    /// Whether the column was filled from the simulated baseline.
    pub simulated: bool,
}

/// Result of one poll cycle, published as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub generation: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub rows: Vec<ComparisonRow>,
    pub source_reports: Vec<SourceReport>,
}

impl BoardSnapshot {
    /// The placeholder published before the first poll completes.
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            generation: 0,
            started_at: now,
            completed_at: now,
            rows: Vec::new(),
            source_reports: Vec::new(),
        }
    }

    pub fn row(&self, key: &OutcomeKey) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| &r.outcome_key == key)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for oddsboard.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OddsboardError {
    #[error("Unparsable American odds: {0:?}")]
    UnparsableOdds(String),

    #[error("Invalid decimal odds: {0}")]
    InvalidDecimalOdds(Decimal),

    #[error("Parlay has no picks")]
    EmptyParlay,

    #[error("Amount too large to represent: {0}")]
    Overflow(String),

    #[error("Source error ({source_id}): {message}")]
    Source { source_id: String, message: String },

    #[error("Source {source_id} timed out after {timeout_ms}ms")]
    SourceTimeout { source_id: String, timeout_ms: u64 },

    #[error("Line mismatch: fantasy line {fantasy} vs sharp line {sharp}")]
    LineMismatch { fantasy: Decimal, sharp: Decimal },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_outcome_key_normalizes_market() {
        let key = OutcomeKey::new("LeBron James", "  Over   25.5 POINTS ");
        assert_eq!(key.market, "over 25.5 points");
        assert_eq!(format!("{key}"), "LeBron James | over 25.5 points");
    }

    #[test]
    fn test_outcome_keys_equal_across_spellings() {
        let a = OutcomeKey::new("Boston Celtics", "Moneyline");
        let b = OutcomeKey::new("Boston Celtics", "moneyline ");
        assert_eq!(a, b);
    }

    #[test]
    fn test_raw_row_deserializes_mixed_prices() {
        let json = r#"[
            {"source_id": "FanDuel", "entity": "Knicks", "market": "ML", "price": -110},
            {"source_id": "BetMGM", "entity": "Knicks", "market": "ML", "price": "+105"},
            {"source_id": "PrizePicks", "entity": "Knicks", "market": "ML", "line": 25.5}
        ]"#;
        let rows: Vec<RawRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].price, Some(RawPrice::Number(-110)));
        assert_eq!(rows[1].price, Some(RawPrice::Text("+105".into())));
        assert_eq!(rows[2].price, None);
        assert_eq!(rows[2].line, Some(LineValue::Number(25.5)));
    }

    #[test]
    fn test_line_value_display() {
        assert_eq!(LineValue::Number(25.5).to_string(), "25.5");
        assert_eq!(LineValue::Text("N/A".into()).to_string(), "N/A");
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Premium).unwrap(), "\"premium\"");
        assert_eq!(Tier::default(), Tier::Standard);
    }

    #[test]
    fn test_event_status_from_str() {
        assert_eq!("LIVE".parse::<EventStatus>().unwrap(), EventStatus::Live);
        assert_eq!("in".parse::<EventStatus>().unwrap(), EventStatus::Live);
        assert_eq!("post".parse::<EventStatus>().unwrap(), EventStatus::Final);
        assert!("halftime?".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_comparison_row_display() {
        let mut prices = BTreeMap::new();
        prices.insert(SourceId::from("DraftKings"), Some(105));
        prices.insert(SourceId::from("Caesars"), None);
        let row = ComparisonRow {
            outcome_key: OutcomeKey::new("LeBron James", "Over 25.5 Points"),
            per_source_price: prices,
            per_source_line: BTreeMap::new(),
            best_source_id: Some(SourceId::from("DraftKings")),
            best_price: Some(105),
            edge: 0,
            tier: Tier::Standard,
        };
        let s = row.to_string();
        assert!(s.contains("DraftKings@+105"));
        assert!(s.contains("(1 sources)"));
    }

    #[test]
    fn test_pick_deserializes_float_stake() {
        let pick: Pick = serde_json::from_str(r#"{"price": "-110", "stake": 12.5}"#).unwrap();
        assert_eq!(pick.stake, dec!(12.5));
    }

    #[test]
    fn test_error_display() {
        let err = OddsboardError::SourceTimeout {
            source_id: "FanDuel".into(),
            timeout_ms: 6000,
        };
        assert_eq!(err.to_string(), "Source FanDuel timed out after 6000ms");
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = BoardSnapshot::empty();
        assert_eq!(snap.generation, 0);
        assert!(snap.rows.is_empty());
    }
}
