//! Team and player name standardization.
//!
//! Free-text names from different sources ("NY Knicks", "GSW",
//! "Lakers Los Angeles") are mapped to one canonical spelling in two
//! stages: an exact, case-insensitive alias lookup, then a token-set
//! fuzzy scan over every registered canonical name. Inputs that score
//! below the cutoff come back trimmed but otherwise unchanged.

pub mod registry;
pub mod similarity;

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::NamesConfig;
pub use registry::CanonicalEntity;
use similarity::token_set_ratio;

/// Default minimum fuzzy score for a match.
pub const DEFAULT_CUTOFF: u8 = 70;

/// Standardizer shared between the poller and the read API.
pub type SharedStandardizer = Arc<RwLock<NameStandardizer>>;

/// How a raw name was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameMatch {
    pub input: String,
    pub canonical: String,
    pub matched: bool,
    /// Fuzzy score of the accepted candidate; `None` for alias hits and
    /// misses.
    pub score: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct NameStandardizer {
    /// Canonical entities in registration order. Fuzzy ties go to the
    /// earliest entry.
    entities: Vec<CanonicalEntity>,
    /// Lowercased alias -> index into `entities`.
    aliases: HashMap<String, usize>,
    cutoff: u8,
}

impl Default for NameStandardizer {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_CUTOFF)
    }
}

impl NameStandardizer {
    /// An empty standardizer: every input passes through unchanged.
    pub fn new(cutoff: u8) -> Self {
        Self {
            entities: Vec::new(),
            aliases: HashMap::new(),
            cutoff,
        }
    }

    /// Standardizer loaded with the built-in league tables and aliases.
    pub fn with_defaults(cutoff: u8) -> Self {
        let mut standardizer = Self::new(cutoff);
        for league in registry::LEAGUES {
            standardizer.add_entities(league.entities.iter().copied());
            debug!(league = league.name, entities = league.entities.len(), "Built-in league loaded");
        }
        for (alias, canonical) in registry::ALIASES {
            standardizer.add_alias(alias, canonical);
        }
        standardizer
    }

    /// Built-in tables extended with configured entities and aliases.
    pub fn from_config(config: &NamesConfig) -> Self {
        let mut standardizer = if config.builtin_tables {
            Self::with_defaults(config.cutoff)
        } else {
            Self::new(config.cutoff)
        };
        standardizer.add_entities(config.entities.iter().map(String::as_str));
        for (alias, canonical) in &config.aliases {
            standardizer.add_alias(alias, canonical);
        }
        info!(
            entities = standardizer.len(),
            aliases = standardizer.aliases.len(),
            cutoff = standardizer.cutoff,
            "Name standardizer ready"
        );
        standardizer
    }

    pub fn into_shared(self) -> SharedStandardizer {
        Arc::new(RwLock::new(self))
    }

    pub fn cutoff(&self) -> u8 {
        self.cutoff
    }

    /// Number of canonical entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, canonical_name: &str) -> Option<&CanonicalEntity> {
        self.entities
            .iter()
            .find(|e| e.canonical_name == canonical_name)
    }

    // -- Registration ----------------------------------------------------

    /// Append canonical entities. Names already registered are skipped.
    /// Each new name also becomes its own alias unless that alias is
    /// already bound.
    pub fn add_entities<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            let name = name.trim();
            if name.is_empty() || self.entity(name).is_some() {
                continue;
            }
            self.entities.push(CanonicalEntity::new(name));
            self.add_alias(name, name);
        }
    }

    /// Bind `alias` to `canonical`, registering `canonical` if needed.
    ///
    /// Returns `false` when the alias is already bound; existing bindings
    /// are never changed.
    pub fn add_alias(&mut self, alias: &str, canonical: &str) -> bool {
        let key = alias.trim().to_lowercase();
        if key.is_empty() || self.aliases.contains_key(&key) {
            return false;
        }
        let canonical = canonical.trim();
        let index = match self.entities.iter().position(|e| e.canonical_name == canonical) {
            Some(index) => index,
            None => {
                self.entities.push(CanonicalEntity::new(canonical));
                self.entities.len() - 1
            }
        };
        self.entities[index].alias_set.insert(key.clone());
        self.aliases.insert(key, index);
        true
    }

    // -- Lookup ----------------------------------------------------------

    /// Canonical name for `raw`, or `raw.trim()` when nothing matches.
    pub fn clean_name(&self, raw: &str) -> String {
        self.resolve(raw).canonical
    }

    /// Like [`clean_name`](Self::clean_name) but reports how the name
    /// was resolved.
    pub fn resolve(&self, raw: &str) -> NameMatch {
        let trimmed = raw.trim();
        let unmatched = || NameMatch {
            input: raw.to_string(),
            canonical: trimmed.to_string(),
            matched: false,
            score: None,
        };
        if trimmed.is_empty() {
            return unmatched();
        }

        // 1. Exact alias.
        if let Some(&index) = self.aliases.get(&trimmed.to_lowercase()) {
            return NameMatch {
                input: raw.to_string(),
                canonical: self.entities[index].canonical_name.clone(),
                matched: true,
                score: None,
            };
        }

        // 2. Fuzzy scan, first candidate wins ties.
        let mut best: Option<(&CanonicalEntity, u8)> = None;
        for entity in &self.entities {
            let score = token_set_ratio(trimmed, &entity.canonical_name);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((entity, score));
            }
        }

        match best {
            Some((entity, score)) if score >= self.cutoff => {
                debug!(input = trimmed, canonical = %entity.canonical_name, score, "Fuzzy name match");
                NameMatch {
                    input: raw.to_string(),
                    canonical: entity.canonical_name.clone(),
                    matched: true,
                    score: Some(score),
                }
            }
            Some((entity, score)) => {
                debug!(
                    input = trimmed,
                    nearest = %entity.canonical_name,
                    score,
                    cutoff = self.cutoff,
                    "No confident name match"
                );
                unmatched()
            }
            None => unmatched(),
        }
    }

    /// Whether two raw names standardize to the same canonical name.
    pub fn is_same_team(&self, a: &str, b: &str) -> bool {
        self.clean_name(a) == self.clean_name(b)
    }

    /// Raw token-set score between two names, ignoring the registry.
    pub fn match_score(&self, a: &str, b: &str) -> u8 {
        token_set_ratio(a, b)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
