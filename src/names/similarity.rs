//! Token-set string similarity.
//!
//! Scores are integers in `0..=100`. Tokens are lowercased alphanumeric
//! words; punctuation is dropped without splitting (`"T-Wolves"` becomes
//! `"twolves"`).

use std::collections::BTreeSet;

/// Edit distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two-row dynamic programming table.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Normalised edit similarity. Two empty strings score 100.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() && b.is_empty() {
        return 100;
    }
    let longest = a.chars().count().max(b.chars().count()).max(1);
    let distance = levenshtein(a, b);
    let score = (1.0 - distance as f64 / longest as f64) * 100.0;
    // JS-style rounding: halves go up.
    (score + 0.5).floor().clamp(0.0, 100.0) as u8
}

/// Deduplicated, sorted lowercase tokens.
pub fn tokenize(s: &str) -> BTreeSet<String> {
    let cleaned: String = s
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().map(String::from).collect()
}

/// Token-set similarity.
///
/// Splits both inputs into token sets and compares the shared tokens
/// against each side's full set; the best of the three pairings wins.
/// Returns 0 when either side has no tokens at all.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let join = |tokens: Vec<&String>| {
        tokens
            .into_iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    };

    let intersection: Vec<&String> = tokens_a.intersection(&tokens_b).collect();
    let diff_a: Vec<&String> = tokens_a.difference(&tokens_b).collect();
    let diff_b: Vec<&String> = tokens_b.difference(&tokens_a).collect();

    let s0 = join(intersection.clone());
    let s1 = join(intersection.iter().copied().chain(diff_a).collect());
    let s2 = join(intersection.iter().copied().chain(diff_b).collect());

    ratio(&s0, &s1).max(ratio(&s0, &s2)).max(ratio(&s1, &s2))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
