//! Odds math.
//!
//! Pure, stateless conversions between American and decimal prices plus
//! stake/payout arithmetic. Every surface that prices a bet goes through
//! these functions. Money and decimal odds are `Decimal`; rounding to an
//! integer American price happens only at display conversion.

pub mod parlay;
pub mod probability;

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::OddsboardError;

pub use parlay::{parlay_decimal_odds, parlay_price, try_parlay_decimal_odds, ParlayQuote};
pub use probability::{
    analyze_fantasy_line, implied_probability, no_vig_probabilities, probability_to_american,
    FantasyAnalysis, FantasySide, DFS_BREAKEVEN_PROBABILITY,
};

/// Price assumed when an odds string cannot be parsed.
pub const FALLBACK_AMERICAN: i32 = -110;

/// Decimal equivalent of [`FALLBACK_AMERICAN`] (`1 + 100/110`).
pub fn fallback_decimal() -> Decimal {
    AmericanOdds(FALLBACK_AMERICAN).to_decimal()
}

// ---------------------------------------------------------------------------
// American odds
// ---------------------------------------------------------------------------

/// A signed American price. Zero is not a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmericanOdds(i32);

impl AmericanOdds {
    pub fn new(value: i32) -> Option<Self> {
        (value != 0).then_some(Self(value))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Decimal (multiplicative) equivalent at full precision.
    pub fn to_decimal(self) -> Decimal {
        let odds = Decimal::from(self.0);
        if self.0 > 0 {
            odds / dec!(100) + Decimal::ONE
        } else {
            dec!(100) / odds.abs() + Decimal::ONE
        }
    }

    /// Profit on a winning `stake` (excludes the stake itself). `None` when
    /// the result does not fit a `Decimal`.
    pub fn to_win(self, stake: Decimal) -> Option<Decimal> {
        let odds = Decimal::from(self.0);
        if self.0 > 0 {
            stake.checked_mul(odds / dec!(100))
        } else {
            stake.checked_div(odds.abs() / dec!(100))
        }
    }
}

impl FromStr for AmericanOdds {
    type Err = OddsboardError;

    /// Accepts `"-110"`, `"+150"`, `" 150 "`. Rejects empty, `"N/A"`,
    /// non-integers and zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        digits
            .parse::<i32>()
            .ok()
            .and_then(AmericanOdds::new)
            .ok_or_else(|| OddsboardError::UnparsableOdds(s.to_string()))
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Convert an American odds string to decimal odds.
///
/// Unparsable input yields the -110 equivalent. Callers that must not
/// guess should use [`try_american_to_decimal`].
pub fn american_to_decimal(odds: &str) -> Decimal {
    try_american_to_decimal(odds).unwrap_or_else(|_| fallback_decimal())
}

/// Strict conversion: unparsable input is reported, not replaced.
pub fn try_american_to_decimal(odds: &str) -> Result<Decimal, OddsboardError> {
    odds.parse::<AmericanOdds>().map(AmericanOdds::to_decimal)
}

/// Convert decimal odds back to an American price.
///
/// Returns `None` for `decimal <= 1` (no payout) or when the result does
/// not fit an `i32`. Midpoints round away from zero.
pub fn decimal_to_american(decimal: Decimal) -> Option<AmericanOdds> {
    try_decimal_to_american(decimal).ok()
}

/// Strict conversion: prices with no American equivalent are reported.
pub fn try_decimal_to_american(decimal: Decimal) -> Result<AmericanOdds, OddsboardError> {
    if decimal <= Decimal::ONE {
        return Err(OddsboardError::InvalidDecimalOdds(decimal));
    }
    let profit = decimal - Decimal::ONE;
    let raw = if decimal >= dec!(2) {
        profit.checked_mul(dec!(100))
    } else {
        dec!(-100).checked_div(profit)
    };
    raw.map(|r| r.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|r| r.to_i32())
        .and_then(AmericanOdds::new)
        .ok_or(OddsboardError::InvalidDecimalOdds(decimal))
}

// ---------------------------------------------------------------------------
// Stake arithmetic
// ---------------------------------------------------------------------------

/// Profit on `stake` at `odds`. Zero for non-positive stakes, unparsable
/// odds and profits too large to represent.
pub fn to_win(stake: Decimal, odds: &str) -> Decimal {
    if stake <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    odds.parse::<AmericanOdds>()
        .ok()
        .and_then(|parsed| parsed.to_win(stake))
        .unwrap_or(Decimal::ZERO)
}

/// Total return on a winning bet: stake plus profit. Falls back to the
/// stake alone when the sum is too large to represent.
pub fn payout(stake: Decimal, odds: &str) -> Decimal {
    stake.checked_add(to_win(stake, odds)).unwrap_or(stake)
}

/// Round a money amount to cents for display.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
