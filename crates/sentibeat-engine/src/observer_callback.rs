//! Tick callback that publishes each view to the timeline server.

use std::sync::Arc;

use sentibeat_core::runner::TickCallback;
use sentibeat_observer::state::AppState;
use sentibeat_types::TimelineView;
use tracing::debug;

/// Replaces the server snapshot and broadcasts to `WebSocket` clients.
///
/// When a REST reader holds the snapshot lock, the write is handed to a
/// background task that waits for the lock. A deferred write never
/// replaces a newer view.
pub struct ObserverCallback {
    state: Arc<AppState>,
}

impl ObserverCallback {
    /// Create a callback backed by `state`.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl TickCallback for ObserverCallback {
    fn on_tick(&mut self, view: &TimelineView) {
        let view = Arc::new(view.clone());

        // Never block the tick loop on a reader.
        if let Ok(mut snap) = self.state.snapshot.try_write() {
            *snap = TimelineView::clone(&view);
        } else {
            debug!(tick = view.tick, "Snapshot busy, deferring update");
            let snapshot = Arc::clone(&self.state.snapshot);
            let view = Arc::clone(&view);
            tokio::spawn(async move {
                let mut snap = snapshot.write().await;
                if snap.tick < view.tick {
                    *snap = TimelineView::clone(&view);
                }
            });
        }

        let receivers = self.state.broadcast(Arc::clone(&view));
        debug!(tick = view.tick, receivers, "Timeline view broadcast");
    }
}
