//! Mock quote source for integration testing.
//!
//! Provides a deterministic `QuoteSource` whose rows, failure mode and
//! latency are all controllable from test code. In-memory, no network.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use oddsboard::sources::QuoteSource;
use oddsboard::types::{RawPrice, RawRow, SourceId};

pub struct MockSource {
    id: SourceId,
    rows: Arc<Mutex<Vec<RawRow>>>,
    /// If set, every fetch returns this error.
    force_error: Arc<Mutex<Option<String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    fetches: AtomicUsize,
}

impl MockSource {
    pub fn new(id: &str) -> Self {
        Self {
            id: SourceId::from(id),
            rows: Arc::new(Mutex::new(Vec::new())),
            force_error: Arc::new(Mutex::new(None)),
            delay: Arc::new(Mutex::new(None)),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Add a priced row.
    pub fn quote(self, entity: &str, market: &str, price: &str) -> Self {
        self.rows.lock().unwrap().push(RawRow {
            source_id: self.id.clone(),
            entity: entity.to_string(),
            market: market.to_string(),
            price: Some(RawPrice::Text(price.to_string())),
            line: None,
        });
        self
    }

    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn clear_error(&self) {
        *self.force_error.lock().unwrap() = None;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for MockSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&self) -> Result<Vec<RawRow>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(anyhow!(msg));
        }
        Ok(self.rows.lock().unwrap().clone())
    }
}
