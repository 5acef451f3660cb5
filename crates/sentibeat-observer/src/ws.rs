//! `WebSocket` handler streaming each tick's view.
//!
//! Clients connect to `GET /ws/timeline` and first receive the current
//! snapshot, then one JSON text frame per completed tick. Lagging clients
//! skip ahead to the newest view.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use sentibeat_types::TimelineView;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade to a `WebSocket` and begin streaming views.
///
/// # Route
///
/// `GET /ws/timeline`
pub async fn ws_timeline(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

async fn send_view(socket: &mut WebSocket, view: &TimelineView) -> bool {
    let json = match serde_json::to_string(view) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize timeline view: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut rx = state.subscribe();

    let current = state.snapshot.read().await.clone();
    if !send_view(&mut socket, &current).await {
        debug!("WebSocket client disconnected (initial send failed)");
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(view) => {
                        if !send_view(&mut socket, &view).await {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}
