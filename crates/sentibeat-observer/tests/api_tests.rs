//! Integration tests for the timeline API endpoints.
//!
//! REST tests drive the Axum `Router` directly via `tower::ServiceExt`
//! without binding a TCP socket. `WebSocket` tests serve on an ephemeral
//! loopback port and speak the RFC 6455 handshake and framing by hand.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sentibeat_core::catalog::ArticlePool;
use sentibeat_core::config::{BoundsConfig, TimelineConfig};
use sentibeat_core::engine::TimelineEngine;
use sentibeat_core::generator::ScriptedEventGenerator;
use sentibeat_core::operator::OperatorState;
use sentibeat_observer::router::build_router;
use sentibeat_observer::server::serve;
use sentibeat_observer::state::AppState;
use sentibeat_types::{EventId, TimelineView};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

/// The seeded view after `ticks` scripted ticks.
fn view_after(ticks: usize) -> TimelineView {
    let pool = ArticlePool::builtin();
    let generator = ScriptedEventGenerator::new(pool.clone());
    let mut engine = TimelineEngine::new(&TimelineConfig::default(), &pool, generator).unwrap();
    for _ in 0..ticks {
        engine.tick();
    }
    engine.view().clone()
}

fn make_test_state() -> Arc<AppState> {
    Arc::new(AppState::new().with_view(view_after(0)))
}

fn make_operator_state() -> (Arc<AppState>, Arc<OperatorState>) {
    let operator = Arc::new(OperatorState::new(2200, &BoundsConfig::default()));
    let state = AppState::with_operator(Arc::clone(&operator)).with_view(view_after(1));
    (Arc::new(state), operator)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(state: Arc<AppState>, path: &str) -> (StatusCode, Value) {
    let response = build_router(state)
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post(state: Arc<AppState>, path: &str, json: Option<&Value>) -> (StatusCode, Value) {
    let request = Request::post(path).header("content-type", "application/json");
    let body = json.map_or_else(Body::empty, |j| Body::from(j.to_string()));
    let response = build_router(state)
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =========================================================================
// Read endpoints
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let response = build_router(make_test_state())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("+1"));
}

#[tokio::test]
async fn test_get_timeline() {
    let (status, json) = get(make_test_state(), "/api/timeline").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tick"], 0);
    assert_eq!(json["points"].as_array().unwrap().len(), 5);
    assert_eq!(json["points"][0]["cumulative"], 1);
    assert_eq!(json["points"][0]["sentiment"], 1);
    assert_eq!(json["points"][1]["sentiment"], -1);
    assert_eq!(json["scoreboard"]["score"], 1);
    assert!(json["area_path"].as_str().unwrap().starts_with("M 80 140"));
    assert_eq!(json["segments"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_scroll_offset_follows_newest_point() {
    // Six points: 2 * 80 + 5 * 120 = 760 px wide.
    let state = Arc::new(AppState::new().with_view(view_after(1)));

    let (status, json) = get(Arc::clone(&state), "/api/timeline/scroll?viewport=500").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tick"], 1);
    assert_eq!(json["chart_width"], 760.0);
    assert_eq!(json["scroll_offset"], 260.0);

    let (_, json) = get(Arc::clone(&state), "/api/timeline/scroll?viewport=1000").await;
    assert_eq!(json["scroll_offset"], 0.0);
}

#[tokio::test]
async fn test_scroll_offset_requires_positive_viewport() {
    let (status, json) = get(make_test_state(), "/api/timeline/scroll").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (status, _) = get(make_test_state(), "/api/timeline/scroll?viewport=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(make_test_state(), "/api/timeline/scroll?viewport=-20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_scoreboard() {
    let (status, json) = get(make_test_state(), "/api/scoreboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 1);
    assert_eq!(json["positive"], 3);
    assert_eq!(json["negative"], 2);
    assert_eq!(json["score_label"], "+1");
}

#[tokio::test]
async fn test_feed_is_newest_first() {
    let (status, json) = get(make_test_state(), "/api/feed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 5);
    assert_eq!(json["items"][0]["id"], EventId::seed(4).to_string());
    assert_eq!(json["items"][4]["id"], EventId::seed(0).to_string());
}

#[tokio::test]
async fn test_feed_limit() {
    let (status, json) = get(make_test_state(), "/api/feed?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);

    let (status, json) = get(make_test_state(), "/api/feed?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_list_sources() {
    let (status, json) = get(make_test_state(), "/api/sources").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 6);
    let sources = json["sources"].as_array().unwrap();
    assert!(sources.iter().any(|s| s["label"] == "arXiv"));
    assert!(
        sources
            .iter()
            .all(|s| s["favicon_url"].as_str().unwrap().contains("sz=64"))
    );
}

#[tokio::test]
async fn test_get_entry_by_id() {
    let path = format!("/api/entries/{}", EventId::seed(2));
    let (status, json) = get(make_test_state(), &path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cumulative"], 1);
    assert_eq!(json["x"], 320.0);
}

#[tokio::test]
async fn test_get_entry_not_in_window() {
    let path = format!("/api/entries/{}", EventId::new());
    let (status, json) = get(make_test_state(), &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_get_entry_invalid_uuid() {
    let (status, _) = get(make_test_state(), "/api/entries/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let response = build_router(make_test_state())
        .oneshot(Request::get("/api/nonexistent").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =========================================================================
// Operator endpoints
// =========================================================================

#[tokio::test]
async fn test_operator_unavailable_without_feed() {
    let (status, json) = post(make_test_state(), "/api/operator/pause", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], 503);
}

#[tokio::test]
async fn test_pause_resume_stop() {
    let (state, operator) = make_operator_state();

    let (status, _) = post(Arc::clone(&state), "/api/operator/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(operator.is_paused());

    let (status, _) = post(Arc::clone(&state), "/api/operator/resume", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!operator.is_paused());

    let (status, json) = post(state, "/api/operator/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert!(operator.is_stop_requested());
}

#[tokio::test]
async fn test_set_speed() {
    let (state, operator) = make_operator_state();

    let body = serde_json::json!({ "tick_interval_ms": 500 });
    let (status, json) = post(Arc::clone(&state), "/api/operator/speed", Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["previous_interval_ms"], 2200);
    assert_eq!(operator.tick_interval_ms(), 500);

    let body = serde_json::json!({ "tick_interval_ms": 50 });
    let (status, _) = post(state, "/api/operator/speed", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(operator.tick_interval_ms(), 500);
}

#[tokio::test]
async fn test_operator_status() {
    let (state, operator) = make_operator_state();
    operator.pause();

    let (status, json) = get(state, "/api/operator/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tick"], 1);
    assert_eq!(json["entries"], 6);
    assert_eq!(json["score"], 2);
    assert_eq!(json["paused"], true);
    assert_eq!(json["tick_interval_ms"], 2200);
    assert!(json["end_reason"].is_null());
}

// =========================================================================
// Broadcast
// =========================================================================

#[tokio::test]
async fn test_broadcast_channel() {
    let state = AppState::new();
    let mut rx = state.subscribe();

    let receivers = state.broadcast(Arc::new(view_after(3)));
    assert_eq!(receivers, 1);

    let received = rx.recv().await.unwrap();
    assert_eq!(received.tick, 3);
    assert_eq!(received.len(), 8);
}

#[tokio::test]
async fn test_broadcast_without_clients() {
    let state = AppState::new();
    assert_eq!(state.broadcast(Arc::new(view_after(0))), 0);
}

// =========================================================================
// WebSocket
// =========================================================================

async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, state));
    addr
}

/// Open `/ws/timeline` and complete the upgrade handshake.
async fn connect_ws(addr: SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET /ws/timeline HTTP/1.1\r\n\
         Host: {addr}\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
         Sec-WebSocket-Version: 13\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    // Byte at a time so no frame data is consumed with the headers.
    let mut head = Vec::new();
    while !head.ends_with(b"\r\n\r\n") {
        head.push(stream.read_u8().await.unwrap());
    }
    let head = String::from_utf8(head).unwrap();
    assert!(head.starts_with("HTTP/1.1 101"), "upgrade refused: {head}");
    stream
}

/// Read one unmasked server text frame and parse it as a view.
async fn read_view(stream: &mut TcpStream) -> TimelineView {
    let opcode = stream.read_u8().await.unwrap() & 0x0F;
    assert_eq!(opcode, 0x1, "expected a text frame");

    let len = match stream.read_u8().await.unwrap() & 0x7F {
        126 => usize::from(stream.read_u16().await.unwrap()),
        127 => usize::try_from(stream.read_u64().await.unwrap()).unwrap(),
        n => usize::from(n),
    };
    let mut payload = vec![0; len];
    stream.read_exact(&mut payload).await.unwrap();
    serde_json::from_slice(&payload).unwrap()
}

#[tokio::test]
async fn test_ws_sends_snapshot_then_broadcasts() {
    let state = make_test_state();
    let addr = spawn_server(Arc::clone(&state)).await;
    let mut stream = connect_ws(addr).await;

    let first = tokio::time::timeout(Duration::from_secs(5), read_view(&mut stream))
        .await
        .unwrap();
    assert_eq!(first.tick, 0);
    assert_eq!(first.len(), 5);

    // The handler subscribes before sending the snapshot.
    assert_eq!(state.broadcast(Arc::new(view_after(1))), 1);
    let next = tokio::time::timeout(Duration::from_secs(5), read_view(&mut stream))
        .await
        .unwrap();
    assert_eq!(next.tick, 1);
    assert_eq!(next.len(), 6);
    assert_eq!(next.feed.first().map(|f| f.id), Some(EventId::scripted(0)));
}

#[tokio::test]
async fn test_ws_burst_reaches_the_newest_view_in_order() {
    let state = make_test_state();
    let addr = spawn_server(Arc::clone(&state)).await;
    let mut stream = connect_ws(addr).await;
    read_view(&mut stream).await;

    let base = view_after(1);
    for tick in 1..=100 {
        let view = TimelineView {
            tick,
            ..base.clone()
        };
        state.broadcast(Arc::new(view));
    }

    // Some views may be skipped if the client lags, but never reordered.
    let mut last = 0;
    while last < 100 {
        let view = tokio::time::timeout(Duration::from_secs(5), read_view(&mut stream))
            .await
            .unwrap();
        assert!(view.tick > last, "tick {} after {last}", view.tick);
        last = view.tick;
    }
}
