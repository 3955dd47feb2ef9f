//! Central drift tick table.
//!
//! One keyed table of [`DriftState`]s behind one lock, advanced by one
//! task. Status changes come from outside (a feed, the read API);
//! entering `Final` drops the entity.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{shift, Shift};
use crate::types::{DriftState, EventStatus};

pub type SharedDrift = Arc<RwLock<DriftScheduler>>;

#[derive(Debug, Default)]
pub struct DriftScheduler {
    states: HashMap<String, DriftState>,
}

impl DriftScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedDrift {
        Arc::new(RwLock::new(self))
    }

    /// Register or update an entity. `Final` removes it and returns the
    /// discarded state. A known entity keeps its tick across status
    /// changes.
    pub fn set_status(&mut self, entity_id: &str, status: EventStatus) -> Option<DriftState> {
        if status == EventStatus::Final {
            let removed = self.states.remove(entity_id);
            if removed.is_some() {
                debug!(entity = entity_id, "Drift state discarded");
            }
            return removed;
        }

        let state = self
            .states
            .entry(entity_id.to_string())
            .or_insert_with(|| DriftState {
                entity_id: entity_id.to_string(),
                tick: 0,
                event_status: status,
            });
        state.event_status = status;
        Some(state.clone())
    }

    /// Advance every live entity by one tick. Returns how many moved.
    pub fn advance(&mut self) -> usize {
        let mut advanced = 0;
        for state in self.states.values_mut() {
            if state.event_status == EventStatus::Live {
                state.tick += 1;
                advanced += 1;
            }
        }
        advanced
    }

    pub fn state(&self, entity_id: &str) -> Option<&DriftState> {
        self.states.get(entity_id)
    }

    /// Current shift. Untracked and non-live entities do not move.
    pub fn shift_for(&self, entity_id: &str) -> Shift {
        match self.states.get(entity_id) {
            Some(state) if state.event_status == EventStatus::Live => {
                shift(&state.entity_id, state.tick)
            }
            _ => Shift::ZERO,
        }
    }

    pub fn is_live(&self, entity_id: &str) -> bool {
        self.states
            .get(entity_id)
            .is_some_and(|s| s.event_status == EventStatus::Live)
    }

    pub fn live_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| s.event_status == EventStatus::Live)
            .count()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Advance `drift` every `cadence` until `shutdown` flips to `true` or its
/// sender is dropped.
pub fn spawn_ticker(
    drift: SharedDrift,
    cadence: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cadence);
        // The first tick completes immediately; live entities start at 0.
        interval.tick().await;
        info!(cadence_secs = cadence.as_secs_f64(), "Drift ticker started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let advanced = drift.write().await.advance();
                    debug!(advanced, "Drift tick");
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Drift ticker stopped");
                        break;
                    }
                }
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
