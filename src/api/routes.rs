//! Read API route handlers.
//!
//! All endpoints return JSON. State is shared via `AppState`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::SharedBoard;
use crate::drift::{SharedDrift, Shift};
use crate::names::{NameMatch, SharedStandardizer};
use crate::odds::ParlayQuote;
use crate::types::{BoardSnapshot, EventStatus, Pick};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Handles to the live board, name table and drift table.
#[derive(Clone)]
pub struct AppState {
    pub board: SharedBoard,
    pub names: SharedStandardizer,
    pub drift: SharedDrift,
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParlayRequest {
    #[serde(default)]
    pub picks: Vec<Pick>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CleanQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    /// `pre`/`live`/`final`; `scheduled`/`in`/`post` are accepted too.
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriftResponse {
    pub entity_id: String,
    pub tick: u64,
    pub event_status: EventStatus,
    pub shift: Shift,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// GET /api/board
pub async fn get_board(State(state): State<AppState>) -> Json<BoardSnapshot> {
    let board = state.board.read().await;
    Json(board.clone())
}

/// POST /api/parlay
pub async fn price_parlay(
    Json(request): Json<ParlayRequest>,
) -> Result<Json<ParlayQuote>, ApiError> {
    ParlayQuote::from_picks(&request.picks)
        .map(Json)
        .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))
}

/// GET /api/names/clean?name=...
pub async fn clean_name(
    State(state): State<AppState>,
    Query(query): Query<CleanQuery>,
) -> Json<NameMatch> {
    let names = state.names.read().await;
    Json(names.resolve(&query.name))
}

/// GET /api/drift/:entity_id
pub async fn get_drift(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
) -> Result<Json<DriftResponse>, ApiError> {
    let drift = state.drift.read().await;
    let tracked = drift
        .state(&entity_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("{entity_id} is not tracked")))?;

    Ok(Json(DriftResponse {
        entity_id: tracked.entity_id.clone(),
        tick: tracked.tick,
        event_status: tracked.event_status,
        shift: drift.shift_for(&entity_id),
    }))
}

/// POST /api/drift/:entity_id/status
pub async fn set_drift_status(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<DriftResponse>, ApiError> {
    let status: EventStatus = update
        .status
        .parse()
        .map_err(|e: crate::types::OddsboardError| error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut drift = state.drift.write().await;
    let previous = drift.set_status(&entity_id, status);
    info!(entity = %entity_id, %status, "Event status updated");

    let tick = previous.map_or(0, |s| s.tick);
    Ok(Json(DriftResponse {
        entity_id: entity_id.clone(),
        tick,
        event_status: status,
        shift: drift.shift_for(&entity_id),
    }))
}
