//! End-to-end poll cycles over mock and simulated sources.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use oddsboard::api::{build_router, AppState};
use oddsboard::board::{MergeConfig, Poller};
use oddsboard::config::AppConfig;
use oddsboard::drift::DriftScheduler;
use oddsboard::names::NameStandardizer;
use oddsboard::sources::{build_sources, QuoteSource, SimulatedBook};
use oddsboard::types::{OutcomeKey, SourceId, SourceStatus, Tier};

use crate::mock_source::MockSource;

fn sid(s: &str) -> SourceId {
    SourceId::from(s)
}

fn knicks_poller(
    sources: Vec<Arc<dyn QuoteSource>>,
    timeout: Duration,
) -> Poller {
    let merge = MergeConfig {
        sources: ["FanDuel", "DraftKings", "Caesars", "Bet365"]
            .into_iter()
            .map(sid)
            .collect(),
        ..MergeConfig::default()
    };
    Poller::new(
        sources,
        merge,
        NameStandardizer::default().into_shared(),
        DriftScheduler::new().into_shared(),
        timeout,
    )
}

#[tokio::test]
async fn test_spellings_merge_into_one_row() {
    let caesars = Arc::new(MockSource::new("Caesars").quote("Knicks", "Moneyline", "+120"));
    caesars.set_error("HTTP 503");

    let sources: Vec<Arc<dyn QuoteSource>> = vec![
        Arc::new(MockSource::new("FanDuel").quote("NY Knicks", "Moneyline", "-110")),
        Arc::new(MockSource::new("DraftKings").quote("New York Knicks", "moneyline", "+105")),
        caesars.clone(),
        Arc::new(MockSource::new("Bet365").quote("knicks", "MONEYLINE ", "-115")),
    ];
    let poller = knicks_poller(sources, Duration::from_millis(500));
    assert!(poller.refresh().await);

    let board = poller.board();
    let snapshot = board.read().await;
    assert_eq!(snapshot.rows.len(), 1);

    let row = &snapshot.rows[0];
    assert_eq!(row.outcome_key, OutcomeKey::new("New York Knicks", "moneyline"));
    assert_eq!(row.best_source_id, Some(sid("DraftKings")));
    assert_eq!(row.best_price, Some(105));
    assert_eq!(row.edge, 215);
    assert_eq!(row.per_source_price[&sid("Caesars")], None);
    assert_eq!(row.tier, Tier::Premium);

    let report = snapshot
        .source_reports
        .iter()
        .find(|r| r.source_id == sid("Caesars"))
        .unwrap();
    assert_eq!(report.status, SourceStatus::Failed);
    assert_eq!(caesars.fetch_count(), 1);
}

#[tokio::test]
async fn test_source_recovers_on_next_poll() {
    let caesars = Arc::new(MockSource::new("Caesars").quote("Knicks", "Moneyline", "+120"));
    caesars.set_error("connection reset");

    let sources: Vec<Arc<dyn QuoteSource>> = vec![
        Arc::new(MockSource::new("FanDuel").quote("NY Knicks", "Moneyline", "-110")),
        caesars.clone(),
    ];
    let poller = knicks_poller(sources, Duration::from_millis(500));

    poller.refresh().await;
    assert_eq!(
        poller.board().read().await.rows[0].per_source_price[&sid("Caesars")],
        None
    );

    caesars.clear_error();
    poller.refresh().await;
    let board = poller.board();
    let snapshot = board.read().await;
    assert_eq!(snapshot.generation, 2);
    assert_eq!(snapshot.rows[0].best_source_id, Some(sid("Caesars")));
    assert_eq!(snapshot.rows[0].best_price, Some(120));
    assert_eq!(snapshot.rows[0].edge, 230);
}

#[tokio::test]
async fn test_slow_source_does_not_hold_the_board() {
    let bet365 = Arc::new(MockSource::new("Bet365").quote("Knicks", "Moneyline", "+150"));
    bet365.set_delay(Duration::from_secs(5));

    let sources: Vec<Arc<dyn QuoteSource>> = vec![
        Arc::new(MockSource::new("FanDuel").quote("NY Knicks", "Moneyline", "-110")),
        bet365,
    ];
    let poller = knicks_poller(sources, Duration::from_millis(100));

    let started = std::time::Instant::now();
    poller.refresh().await;
    assert!(started.elapsed() < Duration::from_secs(2));

    let board = poller.board();
    let snapshot = board.read().await;
    assert_eq!(snapshot.rows[0].best_source_id, Some(sid("FanDuel")));
    assert!(snapshot
        .source_reports
        .iter()
        .any(|r| r.source_id == sid("Bet365") && r.status == SourceStatus::TimedOut));
}

#[tokio::test]
async fn test_sample_config_builds_full_board() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/oddsboard.toml");
    let cfg = AppConfig::load(path).unwrap();

    let names = NameStandardizer::from_config(&cfg.names).into_shared();
    let drift = DriftScheduler::new().into_shared();
    let book = Arc::new(SimulatedBook::from_config(&cfg.simulation));
    let sources = build_sources(&cfg, &book).unwrap();
    let poller = Poller::from_config(&cfg, sources, book, names, drift);

    assert!(poller.refresh().await);
    let board = poller.board();
    let snapshot = board.read().await;

    assert_eq!(snapshot.rows.len(), cfg.simulation.baseline.len());
    assert_eq!(snapshot.source_reports.len(), cfg.sources.len());

    // The disabled feed has no adapter; its column comes from the baseline.
    let fanduel = snapshot
        .source_reports
        .iter()
        .find(|r| r.source_id == sid("FanDuel"))
        .unwrap();
    assert_eq!(fanduel.status, SourceStatus::Unfed);
    assert!(fanduel.simulated);

    for row in &snapshot.rows {
        assert_eq!(row.per_source_price.len(), cfg.sources.len());
        assert_eq!(
            row.best_price,
            row.per_source_price.values().flatten().max().copied()
        );
        assert!(row.edge >= 0);
        // Fantasy sources carry lines, never prices.
        assert_eq!(row.per_source_price[&sid("PrizePicks")], None);
    }

    let curry = snapshot
        .row(&OutcomeKey::new("Stephen Curry", "Over 4.5 Threes"))
        .unwrap();
    assert_eq!(curry.tier, Tier::Premium);
    assert!(curry.per_source_line.contains_key(&sid("PrizePicks")));
    assert!(curry.per_source_price[&sid("Kalshi")].is_some());
}

#[tokio::test]
async fn test_api_serves_published_board() {
    let sources: Vec<Arc<dyn QuoteSource>> = vec![
        Arc::new(MockSource::new("FanDuel").quote("NY Knicks", "Moneyline", "-110")),
        Arc::new(MockSource::new("DraftKings").quote("New York Knicks", "moneyline", "+105")),
    ];
    let poller = knicks_poller(sources, Duration::from_millis(500));
    poller.refresh().await;

    let app = build_router(AppState {
        board: poller.board(),
        names: NameStandardizer::default().into_shared(),
        drift: DriftScheduler::new().into_shared(),
    });
    let resp = app
        .oneshot(Request::builder().uri("/api/board").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["generation"], 1);
    let row = &json["rows"][0];
    assert_eq!(row["best_source_id"], "DraftKings");
    assert_eq!(row["best_price"], 105);
    assert_eq!(row["per_source_price"]["Caesars"], serde_json::Value::Null);
}
