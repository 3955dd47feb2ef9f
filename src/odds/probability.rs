//! Implied-probability helpers.
//!
//! Converts prices to win probabilities, strips the bookmaker margin from
//! a two-way market, and scores fantasy lines against a sharp book.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::debug;

use super::{decimal_to_american, AmericanOdds};
use crate::types::OddsboardError;

/// Win probability a five-pick flex entry needs to break even.
pub const DFS_BREAKEVEN_PROBABILITY: Decimal = dec!(0.542);

/// Implied win probability of an American price, margin included.
pub fn implied_probability(odds: AmericanOdds) -> Decimal {
    let value = Decimal::from(odds.value());
    if odds.value() < 0 {
        value.abs() / (value.abs() + dec!(100))
    } else {
        dec!(100) / (value + dec!(100))
    }
}

/// Margin-free probabilities of a two-way market, summing to one.
pub fn no_vig_probabilities(over: AmericanOdds, under: AmericanOdds) -> (Decimal, Decimal) {
    let over_prob = implied_probability(over);
    let under_prob = implied_probability(under);
    let total = over_prob + under_prob;
    (over_prob / total, under_prob / total)
}

/// Fair American price for a probability in `(0, 1)`.
///
/// Prediction markets quote cents; pass `cents / 100`.
pub fn probability_to_american(probability: Decimal) -> Option<AmericanOdds> {
    if probability <= Decimal::ZERO || probability >= Decimal::ONE {
        return None;
    }
    decimal_to_american(Decimal::ONE / probability)
}

// ---------------------------------------------------------------------------
// Fantasy line analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FantasySide {
    Over,
    Under,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FantasyAnalysis {
    pub side: FantasySide,
    pub win_probability: Decimal,
    /// `win_probability - breakeven`; negative means no value.
    pub edge: Decimal,
    pub profitable: bool,
}

/// Score a fantasy line against a sharp book quoting the same line.
///
/// The favored side is the one with the higher no-vig probability.
pub fn analyze_fantasy_line(
    fantasy_line: Decimal,
    sharp_line: Decimal,
    sharp_over: AmericanOdds,
    sharp_under: AmericanOdds,
    breakeven: Decimal,
) -> Result<FantasyAnalysis, OddsboardError> {
    if fantasy_line != sharp_line {
        return Err(OddsboardError::LineMismatch {
            fantasy: fantasy_line,
            sharp: sharp_line,
        });
    }

    let (true_over, true_under) = no_vig_probabilities(sharp_over, sharp_under);
    let (side, win_probability) = if true_over > true_under {
        (FantasySide::Over, true_over)
    } else {
        (FantasySide::Under, true_under)
    };
    let edge = win_probability - breakeven;

    debug!(
        line = %fantasy_line,
        side = ?side,
        win_probability = %win_probability.round_dp(4),
        edge = %edge.round_dp(4),
        "Fantasy line analysed"
    );

    Ok(FantasyAnalysis {
        side,
        win_probability,
        edge,
        profitable: edge > Decimal::ZERO,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
