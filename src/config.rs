//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `oddsboard.toml` (or the file named by `ODDSBOARD_CONFIG`) and
//! deserializes into strongly-typed structs. Every section has defaults so
//! a minimal file only lists its sources. Secrets (feed API keys) are
//! referenced by env-var name in the config and resolved at runtime via
//! `std::env::var`.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::time::Duration;

use crate::names::DEFAULT_CUTOFF;
use crate::sources::MAX_JITTER;
use crate::types::{LineValue, SourceId};

/// Default config path when `ODDSBOARD_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "oddsboard.toml";
pub const CONFIG_PATH_ENV: &str = "ODDSBOARD_CONFIG";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub names: NamesConfig,
    pub drift: DriftConfig,
    pub api: ApiConfig,
    pub sources: Vec<SourceConfig>,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoardConfig {
    pub poll_interval_secs: u64,
    /// Per-source fetch timeout.
    pub source_timeout_ms: u64,
    /// Edge (in American points) at which a row becomes premium.
    pub premium_edge: i32,
    /// Outcomes always shown as premium, written `"<entity> | <market>"`.
    pub premium_outcomes: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            source_timeout_ms: 6_000,
            premium_edge: 10,
            premium_outcomes: Vec::new(),
        }
    }
}

impl BoardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NamesConfig {
    /// Minimum fuzzy score (0-100) to accept a match.
    pub cutoff: u8,
    /// Load the built-in league tables before the entries below.
    pub builtin_tables: bool,
    /// Extra canonical names, appended after the built-ins.
    pub entities: Vec<String>,
    /// Extra `alias = canonical` shortcuts.
    pub aliases: BTreeMap<String, String>,
}

impl Default for NamesConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            builtin_tables: true,
            entities: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DriftConfig {
    pub cadence_secs: u64,
    /// Canonical entities marked live at startup.
    pub live_entities: Vec<String>,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            cadence_secs: 10,
            live_entities: Vec::new(),
        }
    }
}

impl DriftConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_secs(self.cadence_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// HTTP JSON feed.
    Feed,
    /// Rows generated from the simulation baseline.
    Simulated,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub id: SourceId,
    pub kind: SourceKind,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Feed URL (required for `kind = "feed"`).
    #[serde(default)]
    pub url: Option<String>,
    /// Env var holding the feed API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    /// Fill this column from the simulation baseline when the source
    /// yields nothing.
    #[serde(default)]
    pub fallback: bool,
}

fn default_true() -> bool {
    true
}

fn default_api_key_header() -> String {
    "x-api-key".to_string()
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    /// Maximum jitter, in American points, applied per poll.
    pub jitter: i32,
    pub baseline: Vec<BaselineRow>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            jitter: 8,
            baseline: Vec::new(),
        }
    }
}

/// One outcome of the simulation baseline.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BaselineRow {
    pub entity: String,
    pub market: String,
    /// Line shown by every priced source.
    #[serde(default)]
    pub line: Option<LineValue>,
    /// American price per source.
    #[serde(default)]
    pub prices: BTreeMap<SourceId, i32>,
    /// Line-only quotes (fantasy sources), per source.
    #[serde(default)]
    pub lines: BTreeMap<SourceId, LineValue>,
    /// Prediction-market price in cents (1-99), per source.
    #[serde(default)]
    pub probabilities: BTreeMap<SourceId, u8>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {path}"))?;
        Ok(config)
    }

    /// Load from `ODDSBOARD_CONFIG`, falling back to `oddsboard.toml`.
    pub fn load_default() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(&path)
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.board.poll_interval_secs == 0 {
            bail!("board.poll_interval_secs must be positive");
        }
        if self.board.source_timeout_ms == 0 {
            bail!("board.source_timeout_ms must be positive");
        }
        if self.board.premium_edge < 0 {
            bail!("board.premium_edge must not be negative");
        }
        if self.names.cutoff > 100 {
            bail!("names.cutoff must be between 0 and 100, got {}", self.names.cutoff);
        }
        if self.drift.cadence_secs == 0 {
            bail!("drift.cadence_secs must be positive");
        }
        if !(0..=MAX_JITTER).contains(&self.simulation.jitter) {
            bail!(
                "simulation.jitter must be between 0 and {MAX_JITTER}, got {}",
                self.simulation.jitter
            );
        }

        let mut seen = std::collections::HashSet::new();
        for source in &self.sources {
            if !seen.insert(&source.id) {
                bail!("duplicate source id: {}", source.id);
            }
            if source.kind == SourceKind::Feed && source.enabled && source.url.is_none() {
                bail!("feed source {} has no url", source.id);
            }
        }
        for row in &self.simulation.baseline {
            if let Some((source, price)) = row.prices.iter().find(|(_, p)| **p == 0) {
                bail!("baseline price for {} / {} at {source} is {price}", row.entity, row.market);
            }
            if let Some((source, cents)) = row
                .probabilities
                .iter()
                .find(|(_, c)| **c == 0 || **c >= 100)
            {
                bail!("baseline probability for {} / {} at {source} is {cents}", row.entity, row.market);
            }
        }
        Ok(())
    }

    /// Every configured source id, in config order. These are the columns
    /// of the board.
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id.clone()).collect()
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
