//! Shared application state for the timeline API server.
//!
//! [`AppState`] holds the broadcast channel for tick views and the latest
//! snapshot that the REST endpoints serve.

use std::sync::Arc;

use sentibeat_core::config::FaviconConfig;
use sentibeat_core::operator::OperatorState;
use sentibeat_types::TimelineView;
use tokio::sync::{RwLock, broadcast};

/// Capacity of the broadcast channel.
///
/// A subscriber more than this many views behind receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest.
const BROADCAST_CAPACITY: usize = 64;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Broadcast sender for completed views.
    pub tx: broadcast::Sender<Arc<TimelineView>>,
    /// The latest complete view (replaced each tick).
    pub snapshot: Arc<RwLock<TimelineView>>,
    /// Operator controls, present when a feed is running.
    pub operator_state: Option<Arc<OperatorState>>,
    /// Favicon settings for the source legend.
    pub favicon: FaviconConfig,
}

impl AppState {
    /// Create state with an empty snapshot and no operator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(TimelineView::default())),
            operator_state: None,
            favicon: FaviconConfig::default(),
        }
    }

    /// Create state with operator controls attached.
    pub fn with_operator(operator: Arc<OperatorState>) -> Self {
        Self {
            operator_state: Some(operator),
            ..Self::new()
        }
    }

    /// Use `favicon` for the source legend.
    #[must_use]
    pub fn with_favicon(mut self, favicon: FaviconConfig) -> Self {
        self.favicon = favicon;
        self
    }

    /// Seed the snapshot with an initial view.
    #[must_use]
    pub fn with_view(mut self, view: TimelineView) -> Self {
        self.snapshot = Arc::new(RwLock::new(view));
        self
    }

    /// Subscribe to completed views.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<TimelineView>> {
        self.tx.subscribe()
    }

    /// Push a view to every connected client.
    ///
    /// Returns the number of receivers; 0 when nobody is connected.
    pub fn broadcast(&self, view: Arc<TimelineView>) -> usize {
        self.tx.send(view).unwrap_or(0)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
