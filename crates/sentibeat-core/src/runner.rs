//! The periodic trigger that drives the timeline.
//!
//! [`run_timeline`] wraps [`TimelineEngine::tick`] with the control plane:
//!
//! - **Bounded runs**: stop after `max_ticks` or `max_real_time_seconds`
//! - **Pause/resume**: the loop parks until resumed
//! - **Variable speed**: the interval is re-read before every sleep
//! - **Clean stop**: a stop request interrupts the sleep and no further
//!   tick is applied
//!
//! Every tick waits out one full interval first, so the seeded view stays
//! current for an interval before the first new event lands. Ticks run
//! strictly one after another on the loop's task, so the engine never sees
//! overlapping transitions.

use std::sync::Arc;

use sentibeat_types::TimelineView;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::engine::TimelineEngine;
use crate::generator::EventGenerator;
use crate::operator::{OperatorState, RunEndReason};

/// Errors that can end a run abnormally.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The operator state already recorded a finished run.
    #[error("run already ended: {reason:?}")]
    AlreadyEnded {
        /// The previously recorded reason.
        reason: RunEndReason,
    },
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Why the run ended.
    pub end_reason: RunEndReason,
    /// Ticks applied during this run.
    pub total_ticks: u64,
    /// Engine tick counter at the end of the run.
    pub final_tick: u64,
    /// Net score when the run ended.
    pub final_score: i64,
    /// Window size when the run ended.
    pub final_entries: usize,
}

/// Called after every completed tick.
pub trait TickCallback: Send {
    /// Receives the freshly derived view.
    fn on_tick(&mut self, view: &TimelineView);
}

/// A callback that ignores every tick.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _view: &TimelineView) {}
}

/// Drive `engine` until a bound is reached or the operator stops the run.
///
/// # Errors
///
/// Returns [`RunnerError::AlreadyEnded`] if `operator` belongs to a run
/// that has already finished.
pub async fn run_timeline<G: EventGenerator>(
    engine: &mut TimelineEngine<G>,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> Result<RunResult, RunnerError> {
    if let Some(reason) = operator.end_reason().await {
        return Err(RunnerError::AlreadyEnded { reason });
    }

    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = operator.tick_interval_ms(),
        entries = engine.view().len(),
        "Timeline feed starting"
    );

    let end_reason = loop {
        if operator.is_paused() {
            info!("Timeline feed paused");
            operator.wait_if_paused().await;
            info!("Timeline feed resumed");
        }

        if operator.is_stop_requested() {
            info!("Operator stop requested");
            break RunEndReason::OperatorStop;
        }

        if operator.time_limit_reached() {
            info!(
                max_seconds = operator.max_real_time_seconds(),
                elapsed = operator.elapsed_seconds(),
                "Real-time limit reached"
            );
            break RunEndReason::MaxRealTimeReached;
        }

        let interval = Duration::from_millis(operator.tick_interval_ms());
        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = operator.stopped() => {
                info!("Operator stop requested");
                break RunEndReason::OperatorStop;
            }
        }

        // Paused or out of time mid-interval: re-check before ticking.
        if operator.is_paused() || operator.time_limit_reached() {
            continue;
        }

        let view = engine.tick();
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(view);

        if operator.tick_limit_reached(view.tick) {
            info!(
                tick = view.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            break RunEndReason::MaxTicksReached;
        }
    };

    operator.set_end_reason(end_reason).await;

    let view = engine.view();
    Ok(RunResult {
        end_reason,
        total_ticks,
        final_tick: view.tick,
        final_score: view.scoreboard.score,
        final_entries: view.len(),
    })
}

/// Log how a run ended.
pub fn log_run_end(result: &RunResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_tick,
        final_score = result.final_score,
        final_entries = result.final_entries,
        "Timeline feed ended"
    );

    if result.total_ticks == 0 {
        warn!("Timeline feed ended with no ticks applied");
    }
}
