//! Axum router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, operator, ws};

/// Build the complete router: status page, REST API, operator controls and
/// the `WebSocket` stream, with permissive CORS and request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws/timeline", get(ws::ws_timeline))
        .route("/api/timeline", get(handlers::get_timeline))
        .route("/api/timeline/scroll", get(handlers::get_scroll))
        .route("/api/scoreboard", get(handlers::get_scoreboard))
        .route("/api/feed", get(handlers::list_feed))
        .route("/api/sources", get(handlers::list_sources))
        .route("/api/entries/{id}", get(handlers::get_entry))
        .route("/api/operator/pause", post(operator::pause))
        .route("/api/operator/resume", post(operator::resume))
        .route("/api/operator/speed", post(operator::set_speed))
        .route("/api/operator/stop", post(operator::stop))
        .route("/api/operator/status", get(operator::status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
