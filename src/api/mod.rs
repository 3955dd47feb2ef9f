//! Read API: a small Axum JSON server over the live board.
//!
//! CORS allows GET and POST from any origin.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

pub use routes::AppState;

/// Bind `port` and serve the API on a background task.
///
/// Binding happens before returning so a taken port fails startup.
pub async fn spawn_api(state: AppState, port: u16) -> Result<JoinHandle<()>> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind API port {port}"))?;
    info!(port, "Read API listening on http://localhost:{port}");

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Read API server error");
        }
    }))
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/board", get(routes::get_board))
        .route("/api/parlay", post(routes::price_parlay))
        .route("/api/names/clean", get(routes::clean_name))
        .route("/api/drift/:entity_id", get(routes::get_drift))
        .route("/api/drift/:entity_id/status", post(routes::set_drift_status))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::{shift, DriftScheduler};
    use crate::names::NameStandardizer;
    use crate::types::{BoardSnapshot, EventStatus};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            board: Arc::new(RwLock::new(BoardSnapshot::empty())),
            names: NameStandardizer::default().into_shared(),
            drift: DriftScheduler::new().into_shared(),
        }
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 100).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_board_before_first_poll() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/api/board").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["generation"], 0);
        assert!(json["rows"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_parlay_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(post_json(
                "/api/parlay",
                r#"{"picks": [{"price": "-110", "stake": 10.0}, {"price": "-110", "stake": 0}, {"price": "-110", "stake": 0}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["legs"], 3);
        assert_eq!(json["american"], "+596");
    }

    #[tokio::test]
    async fn test_empty_parlay_rejected() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(post_json("/api/parlay", r#"{"picks": []}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_overflowing_parlay_rejected() {
        let legs = vec![r#"{"price": "+10000", "stake": 1.0}"#; 15].join(",");
        let app = build_router(test_state());
        let resp = app
            .oneshot(post_json("/api/parlay", &format!(r#"{{"picks": [{legs}]}}"#)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert!(json["error"].as_str().unwrap().contains("too large"));
    }

    #[tokio::test]
    async fn test_clean_name_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/names/clean?name=NY%20Knicks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["input"], "NY Knicks");
        assert_eq!(json["canonical"], "New York Knicks");
        assert_eq!(json["matched"], true);
    }

    #[tokio::test]
    async fn test_drift_untracked_is_404() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/api/drift/game-1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_drift_live_entity() {
        let state = test_state();
        {
            let mut drift = state.drift.write().await;
            drift.set_status("game-1", EventStatus::Live);
            drift.advance();
            drift.advance();
            drift.advance();
        }
        let app = build_router(state);
        let resp = app
            .oneshot(Request::builder().uri("/api/drift/game-1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["tick"], 3);
        assert_eq!(json["event_status"], "live");
        assert_eq!(json["shift"]["ml_shift"], shift("game-1", 3).ml_shift);
    }

    #[tokio::test]
    async fn test_drift_status_update() {
        let state = test_state();
        let app = build_router(state.clone());
        let resp = app
            .clone()
            .oneshot(post_json("/api/drift/game-1/status", r#"{"status": "in"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.drift.read().await.is_live("game-1"));

        let resp = app
            .clone()
            .oneshot(post_json("/api/drift/game-1/status", r#"{"status": "final"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(state.drift.read().await.state("game-1").is_none());

        let resp = app
            .oneshot(post_json("/api/drift/game-1/status", r#"{"status": "halftime"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_post() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/parlay")
                    .header("origin", "http://example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
