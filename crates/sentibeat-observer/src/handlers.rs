//! REST API endpoint handlers.
//!
//! All handlers read the latest [`TimelineView`] from the shared
//! [`AppState`] snapshot.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/timeline` | Full current view |
//! | `GET` | `/api/timeline/scroll` | Auto-scroll offset (`?viewport=W`) |
//! | `GET` | `/api/scoreboard` | Score, counts and display label |
//! | `GET` | `/api/feed` | Newest-first feed (`?limit=N`) |
//! | `GET` | `/api/sources` | Source legend with favicon URLs |
//! | `GET` | `/api/entries/{id}` | Single plot point |
//!
//! [`TimelineView`]: sentibeat_types::TimelineView

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use sentibeat_core::catalog;
use sentibeat_core::geometry::scroll_offset;
use sentibeat_types::EventId;
use uuid::Uuid;

use crate::error::ObserverError;
use crate::state::AppState;

/// Default and maximum feed length.
const DEFAULT_FEED_LIMIT: usize = 50;

/// Query parameters for `GET /api/feed`.
#[derive(Debug, serde::Deserialize)]
pub struct FeedQuery {
    /// Maximum number of items (default 50).
    pub limit: Option<usize>,
}

/// Query parameters for `GET /api/timeline/scroll`.
#[derive(Debug, serde::Deserialize)]
pub struct ScrollQuery {
    /// Visible width of the renderer's viewport, in pixels.
    pub viewport: Option<f64>,
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page with the current score and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let tick = snapshot.tick;
    let entries = snapshot.len();
    let score = snapshot.scoreboard.score_label();
    let positive = snapshot.scoreboard.positive;
    let negative = snapshot.scoreboard.negative;
    let score_class = if snapshot.scoreboard.is_non_negative() {
        "up"
    } else {
        "down"
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Sentibeat</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 100px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ font-size: 1.5rem; font-weight: bold; }}
        .up {{ color: #3fb950; }}
        .down {{ color: #f85149; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
    </style>
</head>
<body>
    <h1>Sentibeat</h1>
    <p class="subtitle">Live AI sentiment timeline</p>

    <div>
        <div class="metric">
            <div class="label">Score</div>
            <div class="value {score_class}">{score}</div>
        </div>
        <div class="metric">
            <div class="label">Positive</div>
            <div class="value up">{positive}</div>
        </div>
        <div class="metric">
            <div class="label">Negative</div>
            <div class="value down">{negative}</div>
        </div>
        <div class="metric">
            <div class="label">Entries</div>
            <div class="value">{entries}</div>
        </div>
        <div class="metric">
            <div class="label">Tick</div>
            <div class="value">{tick}</div>
        </div>
    </div>

    <h2>API</h2>
    <ul>
        <li><a href="/api/timeline">/api/timeline</a> -- Current view</li>
        <li><code>/api/timeline/scroll?viewport=W</code> -- Auto-scroll offset</li>
        <li><a href="/api/scoreboard">/api/scoreboard</a> -- Scoreboard</li>
        <li><a href="/api/feed">/api/feed</a> -- Newest-first feed (?limit=N)</li>
        <li><a href="/api/sources">/api/sources</a> -- Source legend</li>
        <li><a href="/api/operator/status">/api/operator/status</a> -- Feed status</li>
        <li><code>ws://host:port/ws/timeline</code> -- Live view stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/timeline
// ---------------------------------------------------------------------------

/// Return the full current view.
pub async fn get_timeline(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    Json(snapshot.clone())
}

// ---------------------------------------------------------------------------
// GET /api/timeline/scroll
// ---------------------------------------------------------------------------

/// Return the horizontal offset that keeps the newest point in a viewport
/// `viewport` pixels wide.
pub async fn get_scroll(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScrollQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let viewport = params
        .viewport
        .ok_or_else(|| ObserverError::InvalidRequest("viewport is required".to_owned()))?;
    if !viewport.is_finite() || viewport <= 0.0 {
        return Err(ObserverError::InvalidRequest(format!(
            "viewport must be a positive width, got {viewport}"
        )));
    }

    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::json!({
        "tick": snapshot.tick,
        "chart_width": snapshot.width,
        "viewport": viewport,
        "scroll_offset": scroll_offset(snapshot.width, viewport),
    })))
}

// ---------------------------------------------------------------------------
// GET /api/scoreboard
// ---------------------------------------------------------------------------

/// Return the scoreboard plus its signed display label.
pub async fn get_scoreboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let board = &snapshot.scoreboard;
    Json(serde_json::json!({
        "tick": snapshot.tick,
        "score": board.score,
        "positive": board.positive,
        "negative": board.negative,
        "score_label": board.score_label(),
        "non_negative": board.is_non_negative(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/feed
// ---------------------------------------------------------------------------

/// Return the newest-first feed, capped at `limit` (default and max 50).
pub async fn list_feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let limit = params.limit.unwrap_or(DEFAULT_FEED_LIMIT);
    if limit == 0 {
        return Err(ObserverError::InvalidRequest(
            "limit must be at least 1".to_owned(),
        ));
    }
    let limit = limit.min(DEFAULT_FEED_LIMIT);

    let snapshot = state.snapshot.read().await;
    let items: Vec<_> = snapshot.feed.iter().take(limit).collect();

    Ok(Json(serde_json::json!({
        "count": items.len(),
        "items": items,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/sources
// ---------------------------------------------------------------------------

/// Return every known source with label, color and favicon URL.
pub async fn list_sources(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sources = catalog::all_sources(&state.favicon);
    Json(serde_json::json!({
        "count": sources.len(),
        "sources": sources,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/entries/{id}
// ---------------------------------------------------------------------------

/// Return one plot point from the current window.
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let id = EventId::from(parse_uuid(&id_str)?);
    let snapshot = state.snapshot.read().await;
    let point = snapshot
        .point(id)
        .ok_or_else(|| ObserverError::NotFound(format!("entry {id}")))?;
    Ok(Json(serde_json::to_value(point)?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_uuid(s: &str) -> Result<Uuid, ObserverError> {
    s.parse::<Uuid>()
        .map_err(|e| ObserverError::InvalidUuid(format!("{s}: {e}")))
}
