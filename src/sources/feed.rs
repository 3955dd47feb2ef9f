//! Generic HTTP JSON feed adapter.
//!
//! GETs a configured URL and expects a JSON array of rows:
//!
//! ```json
//! [{ "entity": "Boston Celtics", "market": "moneyline", "price": "+105", "line": null }]
//! ```
//!
//! `player`/`team` are accepted for `entity` and `prop` for `market`.
//! Auth: optional API key from an env var, sent in a configurable header.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use super::QuoteSource;
use crate::config::{AppConfig, SourceConfig};
use crate::types::{LineValue, OddsboardError, RawPrice, RawRow, SourceId};

/// Client-side ceiling; the poller usually cuts requests off sooner.
const HTTP_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = "oddsboard/0.1.0";

/// Row shape accepted from feeds. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct FeedRow {
    #[serde(alias = "player", alias = "team")]
    entity: String,
    #[serde(alias = "prop")]
    market: String,
    #[serde(default)]
    price: Option<RawPrice>,
    #[serde(default)]
    line: Option<LineValue>,
}

pub struct FeedSource {
    id: SourceId,
    url: String,
    http: Client,
    api_key: Option<SecretString>,
    api_key_header: String,
}

impl FeedSource {
    pub fn new(
        id: SourceId,
        url: impl Into<String>,
        api_key: Option<SecretString>,
        api_key_header: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| format!("Failed to build HTTP client for {id}"))?;

        Ok(Self {
            id,
            url: url.into(),
            http,
            api_key,
            api_key_header: api_key_header.into(),
        })
    }

    /// Build from a `[[sources]]` entry. A missing key env var is logged
    /// and the feed is called without auth.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let url = config
            .url
            .clone()
            .with_context(|| format!("Feed source {} has no url", config.id))?;

        let api_key = match config.api_key_env.as_deref() {
            Some(env) => match AppConfig::resolve_env(env) {
                Ok(key) => Some(SecretString::new(key)),
                Err(e) => {
                    warn!(source = %config.id, error = %e, "API key missing, continuing without");
                    None
                }
            },
            None => None,
        };

        Self::new(config.id.clone(), url, api_key, config.api_key_header.clone())
    }

    /// Decode a feed body into rows tagged with `id`.
    fn parse_rows(id: &SourceId, body: &str) -> Result<Vec<RawRow>> {
        let rows: Vec<FeedRow> = serde_json::from_str(body)
            .with_context(|| format!("Failed to parse {id} feed response"))?;
        Ok(rows
            .into_iter()
            .map(|row| RawRow {
                source_id: id.clone(),
                entity: row.entity,
                market: row.market,
                price: row.price,
                line: row.line,
            })
            .collect())
    }
}

#[async_trait]
impl QuoteSource for FeedSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&self) -> Result<Vec<RawRow>> {
        debug!(source = %self.id, url = %self.url, "Fetching feed");

        let mut request = self.http.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.header(self.api_key_header.as_str(), key.expose_secret().as_str());
        }

        let resp = request
            .send()
            .await
            .with_context(|| format!("{} feed request failed", self.id))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OddsboardError::Source {
                source_id: self.id.to_string(),
                message: format!("HTTP {status}: {body}"),
            }
            .into());
        }

        let body = resp
            .text()
            .await
            .with_context(|| format!("Failed to read {} feed body", self.id))?;
        let rows = Self::parse_rows(&self.id, &body)?;
        debug!(source = %self.id, rows = rows.len(), "Feed fetched");
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
