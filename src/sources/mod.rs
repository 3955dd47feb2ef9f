//! Quote source adapters.
//!
//! Defines the `QuoteSource` trait and provides implementations for:
//! - HTTP JSON feeds (`FeedSource`)
//! - the simulated baseline book (`SimulatedSource`)
//!
//! Adapters only fetch. Timeouts, failure isolation and fallback filling
//! belong to the poller.

pub mod feed;
pub mod simulated;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, SourceKind};
use crate::types::{RawRow, SourceId};

pub use feed::FeedSource;
pub use simulated::{SimulatedBook, SimulatedSource, MAX_JITTER};

/// Abstraction over price sources.
///
/// An empty list means "nothing this cycle"; an error is reported by the
/// poller and treated the same way.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Source id, used as the board column key.
    fn id(&self) -> &SourceId;

    /// Fetch the current rows for this source.
    async fn fetch(&self) -> Result<Vec<RawRow>>;
}

/// Build the enabled adapters described by `config`.
///
/// Feed construction failures (bad HTTP client setup) are fatal; missing
/// API keys are not.
pub fn build_sources(
    config: &AppConfig,
    book: &Arc<SimulatedBook>,
) -> Result<Vec<Arc<dyn QuoteSource>>> {
    let mut sources: Vec<Arc<dyn QuoteSource>> = Vec::new();
    for source in config.sources.iter().filter(|s| s.enabled) {
        match source.kind {
            SourceKind::Feed => sources.push(Arc::new(FeedSource::from_config(source)?)),
            SourceKind::Simulated => sources.push(Arc::new(SimulatedSource::new(
                source.id.clone(),
                Arc::clone(book),
            ))),
        }
    }
    info!(count = sources.len(), "Quote sources configured");
    Ok(sources)
}
