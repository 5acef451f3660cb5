//! Launch the server on a background task next to the tick loop.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::server::{self, ServerConfig, ServerError};
use crate::state::AppState;

/// Errors from spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Bind eagerly, then serve on a background Tokio task.
///
/// A port that is already taken is reported here, not from the task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or the bind
/// fails.
pub async fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, state).await {
            tracing::error!(error = %e, "Timeline server exited with error");
        }
    });

    tracing::info!(%addr, "Timeline server spawned on background task");
    Ok(handle)
}
