use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::scoreboard::{MatchSnapshot, SnapshotService};
use crate::ticker::{derive_view, render_ticker, TickerStore, TickerView};

#[derive(Clone)]
pub struct AppState {
    pub store: TickerStore,
    pub service: SnapshotService,
    /// Browser-side refresh period for the ticker page
    pub refresh_interval_ms: u64,
}

/// Build the Axum router for the ticker.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/ticker", get(ticker_fragment_handler))
        .route("/api/ticker", get(ticker_handler))
        .route("/api/scrape", get(scrape_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the ticker page with the current strip pre-rendered.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ticker = render_ticker(&state.store.state().await);
    let html = TICKER_HTML
        .replace("{{TICKER}}", &ticker)
        .replace("{{REFRESH_MS}}", &state.refresh_interval_ms.to_string());
    Html(html)
}

/// GET /ticker — just the strip, for the page's refresh loop
async fn ticker_fragment_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Html(render_ticker(&state.store.state().await))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TickerPayload {
    status: &'static str,
    snapshot: Option<MatchSnapshot>,
    view: Option<TickerView>,
    updated_at: Option<DateTime<Utc>>,
    consecutive_failures: u32,
}

/// GET /api/ticker
async fn ticker_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let reading = state.store.reading().await;
    let snapshot = reading.state.snapshot();
    Json(TickerPayload {
        status: reading.state.label(),
        view: snapshot.map(|s| derive_view(s)),
        snapshot: snapshot.map(|s| MatchSnapshot::clone(s)),
        updated_at: reading.updated_at,
        consecutive_failures: reading.consecutive_failures,
    })
}

/// GET /api/scrape — render the match page now and return what was extracted
async fn scrape_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.service.fetch().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            error!("Scrape of {} failed: {}", state.service.url(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Embedded single-file ticker page (HTML + CSS + JS)
const TICKER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Live Cricket</title>
<style>
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { font-family: system-ui, sans-serif; background: #0f1117; }
  .ticker { height: 80px; display: flex; align-items: center; justify-content: space-between; padding: 0 1.5rem; color: #fff;
    background: linear-gradient(135deg, rgba(30,64,175,.95) 0%, rgba(109,40,217,.9) 25%, rgba(30,64,175,.95) 50%, rgba(109,40,217,.9) 75%, rgba(30,64,175,.95) 100%); }
  .banner { justify-content: center; font-size: 1.25rem; font-weight: 700; }
  .banner.failed { background: linear-gradient(90deg, #dc2626, #ef4444, #dc2626); }
  .flag { width: 64px; height: 48px; object-fit: cover; border-radius: 2px; box-shadow: 0 4px 8px rgba(0,0,0,.4); }
  .score { display: flex; align-items: center; gap: 1rem; background: rgba(0,0,0,.6); border: 1px solid rgba(255,255,255,.2); border-radius: 8px; padding: .5rem 1.5rem; }
  .score .code { font-weight: 700; font-size: 1.1rem; letter-spacing: .08em; }
  .score .runs { font-weight: 700; font-size: 1.9rem; }
  .score .overs { color: #d1d5db; font-size: 1.1rem; }
  .rate { text-align: center; background: rgba(0,0,0,.4); border: 1px solid rgba(255,255,255,.2); border-radius: 8px; padding: .5rem 1rem; }
  .rate .label { font-size: .7rem; color: #e5e7eb; letter-spacing: .06em; font-weight: 600; }
  .rate .value { font-size: 1.5rem; font-weight: 700; }
  .batsmen { display: flex; gap: 2.5rem; }
  .batsman, .bowler { display: flex; align-items: center; gap: .75rem; }
  .batsman .name, .bowler .name { font-weight: 700; font-size: 1.1rem; letter-spacing: .04em; }
  .batsman .runs { font-weight: 700; font-size: 1.25rem; }
  .batsman .balls { color: #e5e7eb; font-size: .85rem; }
  .not-out { color: #fde047; }
  .bowler .figures { font-weight: 700; font-size: 1.1rem; }
</style>
</head>
<body>
<div id="ticker">{{TICKER}}</div>
<script>
async function refresh() {
  try {
    const r = await fetch('/ticker');
    if (!r.ok) return;
    document.getElementById('ticker').innerHTML = await r.text();
  } catch (e) {
    // keep showing the last strip
  }
}
setInterval(refresh, {{REFRESH_MS}});
</script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoreboard::testing::StaticRenderer;
    use crate::scoreboard::LoadPolicy;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    const PAGE: &str = r#"<div class="live-score-header"><div class="name-wrapper"><span>BOT vs ZIM</span></div></div>
        <div class="playing-batsmen-wrapper">
          <div class="batsmen-partnership">
            <div class="batsmen-name"><p>Babar Azam</p></div>
            <div class="batsmen-score"><p>56*</p><p>(40)</p></div>
          </div>
        </div>"#;

    fn app(page: Option<&str>, store: TickerStore) -> Router {
        let service = SnapshotService::new(
            Arc::new(StaticRenderer(page.map(str::to_string))),
            "https://example.test/live",
            LoadPolicy::DomContentLoaded,
        );
        router(AppState {
            store,
            service,
            refresh_interval_ms: 30_000,
        })
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_scrape_returns_snapshot_json() {
        let (status, body) = get(app(Some(PAGE), TickerStore::new()), "/api/scrape").await;
        assert_eq!(status, StatusCode::OK);

        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["matchTitle"], "BOT vs ZIM");
        assert_eq!(v["batsmen"][0]["runs"], "56*");
        assert_eq!(v["batsmen"][0]["balls"], "40");
        assert_eq!(v["team1"]["score"], "");
        assert!(v["team1"]["name"].is_null());
        assert!(v["bowler"].is_null());
        assert_eq!(v["runRates"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_scrape_failure_is_error_payload() {
        let (status, body) = get(app(None, TickerStore::new()), "/api/scrape").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(v["error"].as_str().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_ticker_json_while_loading() {
        let (status, body) = get(app(Some(PAGE), TickerStore::new()), "/api/ticker").await;
        assert_eq!(status, StatusCode::OK);

        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["status"], "loading");
        assert!(v["snapshot"].is_null());
        assert!(v["view"].is_null());
    }

    #[tokio::test]
    async fn test_ticker_json_when_ready() {
        let store = TickerStore::new();
        store
            .apply(1, Ok(crate::scoreboard::extract_snapshot(PAGE)))
            .await;

        let (_, body) = get(app(Some(PAGE), store), "/api/ticker").await;
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["status"], "ready");
        assert_eq!(v["view"]["currentRate"], "7.86");
        assert_eq!(v["view"]["batsmen"][0]["name"], "AZAM");
        assert_eq!(v["view"]["batsmen"][0]["notOut"], true);
        assert!(v["updatedAt"].is_string());
        assert_eq!(v["consecutiveFailures"], 0);
    }

    #[tokio::test]
    async fn test_index_shows_failure_banner() {
        let store = TickerStore::new();
        store.apply(1, Err(anyhow::anyhow!("offline"))).await;

        let (status, body) = get(app(None, store), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Failed to Load Data"));
        assert!(body.contains("setInterval(refresh, 30000)"));
    }

    #[tokio::test]
    async fn test_ticker_fragment() {
        let (_, body) = get(app(None, TickerStore::new()), "/ticker").await;
        assert!(body.contains("Loading Live Cricket..."));
        assert!(!body.contains("<html"));
    }
}
