//! Raw adapter rows to keyed quotes.

use std::collections::HashMap;
use tracing::debug;

use crate::names::NameStandardizer;
use crate::odds::AmericanOdds;
use crate::types::{OutcomeKey, PriceQuote, RawPrice, RawRow};

/// Parse a raw feed price. Zero, out-of-range and unparsable values are
/// `None`; the -110 fallback is for arithmetic only, not for the board.
pub fn parse_price(raw: &RawPrice) -> Option<i32> {
    match raw {
        RawPrice::Number(n) => i32::try_from(*n).ok().and_then(AmericanOdds::new),
        RawPrice::Text(s) => s.parse::<AmericanOdds>().ok(),
    }
    .map(AmericanOdds::value)
}

/// Canonicalize entity names and markets and parse prices.
///
/// Each distinct entity spelling is resolved once per batch.
pub fn normalize_rows(rows: &[RawRow], names: &NameStandardizer) -> Vec<PriceQuote> {
    let mut resolved: HashMap<&str, String> = HashMap::new();

    rows.iter()
        .map(|row| {
            let entity = resolved
                .entry(row.entity.as_str())
                .or_insert_with(|| names.clean_name(&row.entity))
                .clone();

            let price = row.price.as_ref().and_then(|raw| {
                let parsed = parse_price(raw);
                if parsed.is_none() {
                    debug!(source = %row.source_id, entity = %row.entity, price = ?raw, "Unparsable price dropped");
                }
                parsed
            });

            PriceQuote {
                source_id: row.source_id.clone(),
                outcome_key: OutcomeKey::new(entity, &row.market),
                price,
                line_value: row.line.clone(),
            }
        })
        .collect()
}
