//! Live price drift simulator.
//!
//! Produces small, bounded, reproducible price movements for live events
//! that have no real feed. A shift is a pure function of
//! `(entity_id, tick)`; the scheduler in [`scheduler`] owns the ticks.

pub mod scheduler;

use serde::Serialize;

use crate::types::LineValue;

pub use scheduler::{spawn_ticker, DriftScheduler, SharedDrift};

/// Moneyline prices may not land strictly inside this band.
const MONEYLINE_FLOOR: i32 = 100;
/// Where a moneyline that fell into the band is pushed out to.
const MONEYLINE_CLAMP: i32 = 105;
/// Replacement for a signed spread that would otherwise read zero.
const MIN_LINE: f64 = 0.5;

/// One drift step for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shift {
    /// Spread points, `-2.0..=2.0` in halves.
    pub spread_shift: f64,
    /// Moneyline points, `-25..=25` in fives.
    pub ml_shift: i32,
    /// Total points, `-3.0..=3.0` in halves.
    pub total_shift: f64,
    /// Confidence percentage points, `-4..=4`.
    pub confidence_shift: i32,
}

impl Shift {
    pub const ZERO: Shift = Shift {
        spread_shift: 0.0,
        ml_shift: 0,
        total_shift: 0.0,
        confidence_shift: 0,
    };
}

/// 32-bit polynomial rolling hash over the UTF-16 code units of
/// `entity_id` followed by the decimal digits of `tick`.
pub fn hash(entity_id: &str, tick: u64) -> u32 {
    let input = format!("{entity_id}{tick}");
    input
        .encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// Shift for `entity_id` at `tick`. Same inputs, same output.
pub fn shift(entity_id: &str, tick: u64) -> Shift {
    let h = hash(entity_id, tick);
    // Each modulus is small, so the casts are lossless.
    let m9 = (h % 9) as i32;
    let m11 = (h % 11) as i32;
    let m13 = (h % 13) as i32;
    Shift {
        spread_shift: f64::from(m9 - 4) / 2.0,
        ml_shift: (m11 - 5) * 5,
        total_shift: f64::from(m13 - 6) / 2.0,
        confidence_shift: m9 - 4,
    }
}

/// Move an American price by `delta`, keeping it out of `(-100, 100)`.
///
/// `-100` itself is left alone; it is a valid even-money price.
pub fn shift_moneyline(price: i32, delta: i32) -> i32 {
    let shifted = price.saturating_add(delta);
    if (0..MONEYLINE_FLOOR).contains(&shifted) {
        MONEYLINE_CLAMP
    } else if shifted > -MONEYLINE_FLOOR && shifted < 0 {
        -MONEYLINE_CLAMP
    } else {
        shifted
    }
}

/// Apply a shift to a displayed price or line.
///
/// Values containing `.` or with magnitude under 100 are treated as
/// spreads/totals and rendered with one decimal place; anything else is a
/// moneyline. Empty, `"N/A"` and unparsable text come back unchanged.
pub fn apply_shift(display: &str, shift: f64) -> String {
    let trimmed = display.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
        return display.to_string();
    }
    let signed = trimmed.starts_with('+') || trimmed.starts_with('-');
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let Ok(value) = digits.parse::<f64>() else {
        return display.to_string();
    };
    if !value.is_finite() {
        return display.to_string();
    }

    let is_line = trimmed.contains('.') || value.abs() < f64::from(MONEYLINE_FLOOR);
    if is_line {
        render_line(value + shift, signed, trimmed.starts_with('-'))
    } else {
        // Integer moneyline; `is_line` caught every fractional value.
        let shifted = shift_moneyline(value as i32, shift.round() as i32);
        format!("{shifted:+}")
    }
}

/// Move a quoted line for `market`: spreads by `spread_shift`, anything
/// else (totals, player props) by `total_shift`. Text lines go through
/// [`apply_shift`], so notations it does not understand stay as they are.
pub fn shift_line(line: &LineValue, market: &str, shift: Shift) -> LineValue {
    let amount = if market.to_lowercase().contains("spread") {
        shift.spread_shift
    } else {
        shift.total_shift
    };
    if amount == 0.0 {
        return line.clone();
    }
    match line {
        LineValue::Text(text) => LineValue::Text(apply_shift(text, amount)),
        // One decimal place keeps whole-number totals out of moneyline handling.
        LineValue::Number(n) => apply_shift(&format!("{n:.1}"), amount)
            .parse()
            .map(LineValue::Number)
            .unwrap_or_else(|_| line.clone()),
    }
}

fn render_line(value: f64, signed: bool, was_negative: bool) -> String {
    if value.abs() < 0.05 {
        return match (signed, was_negative) {
            (true, true) => format!("{:.1}", -MIN_LINE),
            (true, false) => format!("{MIN_LINE:+.1}"),
            (false, _) => "0.0".to_string(),
        };
    }
    if signed {
        format!("{value:+.1}")
    } else {
        format!("{value:.1}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_hash_known_values() {
        assert_eq!(hash("espn-401584", 7), 3_613_963_642);
        assert_eq!(hash("espn-401584", 0), 3_613_963_635);
        assert_eq!(hash("game-1", 3), 4_099_311_069);
        assert_eq!(hash("", 0), 48);
    }

    #[test]
    fn test_shift_known_values() {
        assert_eq!(
            shift("espn-401584", 7),
            Shift { spread_shift: 1.5, ml_shift: -10, total_shift: -1.5, confidence_shift: 3 }
        );
        assert_eq!(
            shift("espn-401584", 0),
            Shift { spread_shift: -2.0, ml_shift: 10, total_shift: 1.5, confidence_shift: -4 }
        );
        assert_eq!(
            shift("game-1", 3),
            Shift { spread_shift: 1.0, ml_shift: 10, total_shift: 1.5, confidence_shift: 2 }
        );
    }

    #[test]
    fn test_shift_deterministic_and_bounded() {
        let mut rng = StdRng::seed_from_u64(0x0dd5);
        for _ in 0..10_000 {
            let len = rng.gen_range(1..24);
            let entity: String = (0..len)
                .map(|_| rng.gen_range(b'a'..=b'z') as char)
                .collect();
            let tick = rng.gen_range(0..1_000_000u64);

            let s = shift(&entity, tick);
            assert_eq!(s, shift(&entity, tick));

            assert!((-2.0..=2.0).contains(&s.spread_shift));
            assert_eq!((s.spread_shift * 2.0).fract(), 0.0);
            assert!((-25..=25).contains(&s.ml_shift));
            assert_eq!(s.ml_shift % 5, 0);
            assert!((-3.0..=3.0).contains(&s.total_shift));
            assert_eq!((s.total_shift * 2.0).fract(), 0.0);
            assert!((-4..=4).contains(&s.confidence_shift));
        }
    }

    #[test]
    fn test_non_ascii_entity_hashes_utf16() {
        // U+00E9 is one UTF-16 unit (233); the hash must not see two bytes.
        let expected = 233u32.wrapping_mul(31).wrapping_add(u32::from(b'1'));
        assert_eq!(hash("\u{e9}", 1), expected);
    }

    #[test]
    fn test_apply_shift_passthrough() {
        assert_eq!(apply_shift("N/A", 1.5), "N/A");
        assert_eq!(apply_shift("", 1.5), "");
        assert_eq!(apply_shift("O 8.5", 1.0), "O 8.5");
        assert_eq!(apply_shift("even", 5.0), "even");
    }

    #[test]
    fn test_apply_shift_spread() {
        assert_eq!(apply_shift("-4.5", 1.5), "-3.0");
        assert_eq!(apply_shift("+3.5", -1.0), "+2.5");
        assert_eq!(apply_shift("-1.5", 2.0), "+0.5");
    }

    #[test]
    fn test_apply_shift_signed_zero_nudged() {
        assert_eq!(apply_shift("+1.5", -1.5), "+0.5");
        assert_eq!(apply_shift("-2.0", 2.0), "-0.5");
        assert_eq!(apply_shift("-3", 3.0), "-0.5");
    }

    #[test]
    fn test_apply_shift_total_keeps_unsigned_notation() {
        assert_eq!(apply_shift("228.5", 1.5), "230.0");
        assert_eq!(apply_shift("8.5", -3.0), "5.5");
    }

    #[test]
    fn test_apply_shift_moneyline() {
        assert_eq!(apply_shift("+150", 10.0), "+160");
        assert_eq!(apply_shift("-130", -25.0), "-155");
        assert_eq!(apply_shift("+110", -15.0), "+105");
        assert_eq!(apply_shift("-110", 20.0), "-105");
        assert_eq!(apply_shift("100", -5.0), "+105");
    }

    #[test]
    fn test_shift_moneyline_clamps_out_of_band() {
        assert_eq!(shift_moneyline(105, -10), 105);
        assert_eq!(shift_moneyline(-105, 10), -105);
        assert_eq!(shift_moneyline(-100, 0), -100);
        assert_eq!(shift_moneyline(-120, 25), -105);
        assert_eq!(shift_moneyline(200, -25), 175);
    }

    #[test]
    fn test_shift_line_picks_amount_by_market() {
        let s = Shift { spread_shift: -1.5, ml_shift: 10, total_shift: 2.0, confidence_shift: 0 };

        assert_eq!(shift_line(&LineValue::Number(25.5), "Over 25.5 Points", s), LineValue::Number(27.5));
        assert_eq!(shift_line(&LineValue::Number(220.0), "Total", s), LineValue::Number(222.0));
        assert_eq!(shift_line(&LineValue::Number(-3.5), "Spread", s), LineValue::Number(-5.0));
        assert_eq!(
            shift_line(&LineValue::Text("+1.5".into()), "spread", s),
            LineValue::Text("+0.5".into())
        );
        assert_eq!(
            shift_line(&LineValue::Text("O 8.5".into()), "Total", s),
            LineValue::Text("O 8.5".into())
        );
        assert_eq!(shift_line(&LineValue::Number(25.5), "Points", Shift::ZERO), LineValue::Number(25.5));
    }

    #[test]
    fn test_apply_shift_never_degenerate() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let s = shift(&format!("event-{}", rng.gen::<u32>()), rng.gen_range(0..500));

            let magnitude = rng.gen_range(100..600);
            let ml = if rng.gen_bool(0.5) { magnitude } else { -magnitude };
            let out = apply_shift(&format!("{ml:+}"), f64::from(s.ml_shift));
            let shifted: i32 = out.trim_start_matches('+').parse().unwrap();
            assert!(!(-99..=99).contains(&shifted), "{ml} -> {out}");

            let halves = rng.gen_range(-20..=20);
            let spread = format!("{:+.1}", f64::from(halves) / 2.0);
            let out = apply_shift(&spread, s.spread_shift);
            assert!(out != "+0.0" && out != "-0.0" && out != "0.0", "{spread} -> {out}");
        }
    }
}
