//! Operator REST API handlers for runtime control of the feed.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/operator/pause` | Pause the tick loop |
//! | `POST` | `/api/operator/resume` | Resume the tick loop |
//! | `POST` | `/api/operator/speed` | Set tick interval (ms) |
//! | `POST` | `/api/operator/stop` | Stop the feed before its next tick |
//! | `GET` | `/api/operator/status` | Current run status |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use sentibeat_core::operator::{MIN_TICK_INTERVAL_MS, OperatorState};
use tracing::info;

use crate::error::ObserverError;
use crate::state::AppState;

/// Request body for `POST /api/operator/speed`.
#[derive(Debug, serde::Deserialize)]
pub struct SetSpeedRequest {
    /// New tick interval in milliseconds (minimum 100).
    pub tick_interval_ms: u64,
}

#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    ok: bool,
    message: &'static str,
}

fn operator(state: &AppState) -> Result<&Arc<OperatorState>, ObserverError> {
    state
        .operator_state
        .as_ref()
        .ok_or(ObserverError::OperatorUnavailable)
}

/// Pause the feed. The current view stays visible.
pub async fn pause(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    operator(&state)?.pause();
    info!("Operator paused the feed");
    Ok(Json(OperatorResponse {
        ok: true,
        message: "Feed paused",
    }))
}

/// Resume a paused feed.
pub async fn resume(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    operator(&state)?.resume();
    info!("Operator resumed the feed");
    Ok(Json(OperatorResponse {
        ok: true,
        message: "Feed resumed",
    }))
}

/// Change the tick interval. Takes effect from the next sleep.
pub async fn set_speed(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetSpeedRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let previous = operator(&state)?
        .set_tick_interval_ms(body.tick_interval_ms)
        .ok_or_else(|| {
            ObserverError::InvalidRequest(format!(
                "tick_interval_ms must be at least {MIN_TICK_INTERVAL_MS}"
            ))
        })?;

    info!(
        previous_ms = previous,
        new_ms = body.tick_interval_ms,
        "Operator changed tick interval"
    );

    Ok(Json(serde_json::json!({
        "ok": true,
        "previous_interval_ms": previous,
        "new_interval_ms": body.tick_interval_ms,
    })))
}

/// Stop the feed. No tick is applied after this returns.
pub async fn stop(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    operator(&state)?.request_stop();
    info!("Operator requested stop");
    Ok(Json(OperatorResponse {
        ok: true,
        message: "Stop requested",
    }))
}

/// Return the run status with the current tick, window size and score.
pub async fn status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ObserverError> {
    let operator = operator(&state)?;
    let (tick, entries, score) = {
        let snapshot = state.snapshot.read().await;
        (snapshot.tick, snapshot.len(), snapshot.scoreboard.score)
    };
    Ok(Json(operator.status(tick, entries, score).await))
}
