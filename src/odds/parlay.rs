//! Parlay combination.
//!
//! Combined decimal odds are the product of each leg's decimal odds, kept
//! at full precision until the final American rendering.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{american_to_decimal, decimal_to_american};
use crate::types::{OddsboardError, Pick};

/// Product of every leg's decimal odds. `None` for an empty ticket or a
/// product too large to represent.
pub fn parlay_decimal_odds(picks: &[Pick]) -> Option<Decimal> {
    try_parlay_decimal_odds(picks).ok()
}

/// Strict product: empty tickets and overflowing products are reported.
pub fn try_parlay_decimal_odds(picks: &[Pick]) -> Result<Decimal, OddsboardError> {
    if picks.is_empty() {
        return Err(OddsboardError::EmptyParlay);
    }
    picks
        .iter()
        .try_fold(Decimal::ONE, |acc, pick| {
            acc.checked_mul(american_to_decimal(&pick.price))
        })
        .ok_or_else(|| OddsboardError::Overflow(format!("{}-leg parlay odds", picks.len())))
}

/// Display price for a ticket.
///
/// A single pick keeps its own price string untouched; two or more legs
/// render the combined decimal as American odds.
pub fn parlay_price(picks: &[Pick]) -> Option<String> {
    match picks {
        [] => None,
        [single] => Some(single.price.clone()),
        _ => parlay_decimal_odds(picks)
            .and_then(decimal_to_american)
            .map(|odds| odds.to_string()),
    }
}

/// Derived values for a whole ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParlayQuote {
    pub legs: usize,
    pub decimal_odds: Decimal,
    pub american: Option<String>,
    pub total_stake: Decimal,
    pub to_win: Decimal,
    pub payout: Decimal,
}

impl ParlayQuote {
    /// Price a ticket. The risk is the sum of the leg stakes; profit is
    /// computed from the unrounded combined decimal.
    pub fn from_picks(picks: &[Pick]) -> Result<Self, OddsboardError> {
        let decimal_odds = try_parlay_decimal_odds(picks)?;
        let overflow = || OddsboardError::Overflow("parlay stake or payout".to_string());

        let total_stake = picks
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.stake))
            .ok_or_else(overflow)?;
        let to_win = if total_stake > Decimal::ZERO {
            total_stake
                .checked_mul(decimal_odds - Decimal::ONE)
                .ok_or_else(overflow)?
        } else {
            Decimal::ZERO
        };
        let payout = total_stake.checked_add(to_win).ok_or_else(overflow)?;

        Ok(Self {
            legs: picks.len(),
            decimal_odds,
            american: parlay_price(picks),
            total_stake,
            to_win,
            payout,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
