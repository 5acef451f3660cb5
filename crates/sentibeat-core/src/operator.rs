//! Operator control state for the running timeline.
//!
//! Shared between the tick loop and the operator REST API. The operator can
//! pause and resume the feed, change its speed, and stop it cleanly. A stop
//! request takes effect before the next tick, even while the loop is
//! sleeping or paused.
//!
//! Control fields are atomics so the tick loop reads them without locks.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::config::BoundsConfig;

/// Smallest accepted tick interval.
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// Shared operator control state.
///
/// Wrapped in [`Arc`](std::sync::Arc) and shared between the tick loop and
/// the API handlers.
#[derive(Debug)]
pub struct OperatorState {
    paused: AtomicBool,
    resume_notify: Notify,
    stop_requested: AtomicBool,
    stop_notify: Notify,
    tick_interval_ms: AtomicU64,
    started_at: DateTime<Utc>,
    max_ticks: u64,
    max_real_time_seconds: u64,
    end_reason: Mutex<Option<RunEndReason>>,
}

impl OperatorState {
    /// Create operator state with the configured interval and bounds.
    ///
    /// Intervals below [`MIN_TICK_INTERVAL_MS`] are raised to it.
    pub fn new(tick_interval_ms: u64, bounds: &BoundsConfig) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::new(),
            tick_interval_ms: AtomicU64::new(tick_interval_ms.max(MIN_TICK_INTERVAL_MS)),
            started_at: Utc::now(),
            max_ticks: bounds.max_ticks,
            max_real_time_seconds: bounds.max_real_time_seconds,
            end_reason: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Whether the feed is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the feed. The loop parks before its next tick.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the feed and wake the loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until resumed or stopped. Returns immediately when running.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop. Wakes the loop if it is sleeping or paused.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_waiters();
        self.resume_notify.notify_one();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Resolves once a stop has been requested.
    pub async fn stopped(&self) {
        loop {
            let notified = self.stop_notify.notified();
            if self.is_stop_requested() {
                return;
            }
            notified.await;
        }
    }

    /// Record why the run ended.
    pub async fn set_end_reason(&self, reason: RunEndReason) {
        *self.end_reason.lock().await = Some(reason);
    }

    /// Why the run ended, if it has.
    pub async fn end_reason(&self) -> Option<RunEndReason> {
        *self.end_reason.lock().await
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval. Returns the previous interval, or `None` when
    /// `ms` is below [`MIN_TICK_INTERVAL_MS`].
    pub fn set_tick_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        Some(self.tick_interval_ms.swap(ms, Ordering::AcqRel))
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// `true` once `current_tick` reaches a non-zero `max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// `true` once the elapsed wall-clock time reaches a non-zero limit.
    pub fn time_limit_reached(&self) -> bool {
        self.max_real_time_seconds > 0 && self.elapsed_seconds() >= self.max_real_time_seconds
    }

    /// Wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Seconds since start. Clock skew that would go negative reads as 0.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// Configured tick limit (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Configured time limit in seconds (0 = unlimited).
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }

    /// Snapshot the control state for the status endpoint.
    pub async fn status(&self, tick: u64, entries: usize, score: i64) -> RunStatus {
        RunStatus {
            tick,
            paused: self.is_paused(),
            stop_requested: self.is_stop_requested(),
            tick_interval_ms: self.tick_interval_ms(),
            elapsed_seconds: self.elapsed_seconds(),
            max_ticks: self.max_ticks,
            max_real_time_seconds: self.max_real_time_seconds,
            entries,
            score,
            end_reason: self.end_reason().await,
            started_at: self.started_at.to_rfc3339(),
        }
    }
}

/// JSON status of the run for the operator API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    /// Latest completed tick.
    pub tick: u64,
    /// Whether the feed is paused.
    pub paused: bool,
    /// Whether a stop has been requested.
    pub stop_requested: bool,
    /// Current tick interval in milliseconds.
    pub tick_interval_ms: u64,
    /// Wall-clock seconds since start.
    pub elapsed_seconds: u64,
    /// Configured tick limit (0 = unlimited).
    pub max_ticks: u64,
    /// Configured time limit in seconds (0 = unlimited).
    pub max_real_time_seconds: u64,
    /// Entries in the current window.
    pub entries: usize,
    /// Current net score.
    pub score: i64,
    /// Why the run ended, once it has.
    pub end_reason: Option<RunEndReason>,
    /// RFC 3339 start timestamp.
    pub started_at: String,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    fn unbounded() -> OperatorState {
        OperatorState::new(1000, &BoundsConfig::default())
    }

    #[test]
    fn starts_running() {
        let state = unbounded();
        assert!(!state.is_paused());
        assert!(!state.is_stop_requested());
    }

    #[test]
    fn pause_and_resume() {
        let state = unbounded();
        state.pause();
        assert!(state.is_paused());
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn speed_changes_and_floor() {
        let state = unbounded();
        assert_eq!(state.set_tick_interval_ms(2200), Some(1000));
        assert_eq!(state.tick_interval_ms(), 2200);
        assert_eq!(state.set_tick_interval_ms(99), None);
        assert_eq!(state.tick_interval_ms(), 2200);
        assert_eq!(state.set_tick_interval_ms(100), Some(2200));
    }

    #[test]
    fn initial_interval_is_raised_to_the_floor() {
        let state = OperatorState::new(0, &BoundsConfig::default());
        assert_eq!(state.tick_interval_ms(), MIN_TICK_INTERVAL_MS);
        let state = OperatorState::new(2200, &BoundsConfig::default());
        assert_eq!(state.tick_interval_ms(), 2200);
    }

    #[test]
    fn zero_bounds_mean_unlimited() {
        let state = unbounded();
        assert!(!state.tick_limit_reached(u64::MAX));
        assert!(!state.time_limit_reached());
    }

    #[test]
    fn tick_limit() {
        let bounds = BoundsConfig {
            max_ticks: 10,
            max_real_time_seconds: 0,
        };
        let state = OperatorState::new(1000, &bounds);
        assert!(!state.tick_limit_reached(9));
        assert!(state.tick_limit_reached(10));
        assert!(state.tick_limit_reached(11));
    }

    #[tokio::test]
    async fn stop_wakes_waiters() {
        let state = Arc::new(unbounded());
        let waiter = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.stopped().await })
        };
        tokio::task::yield_now().await;
        state.request_stop();
        let woke = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(woke.is_ok());
    }

    #[tokio::test]
    async fn stop_releases_a_paused_loop() {
        let state = Arc::new(unbounded());
        state.pause();
        let waiter = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.wait_if_paused().await })
        };
        tokio::task::yield_now().await;
        state.request_stop();
        let woke = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(woke.is_ok());
        assert!(state.is_paused());
    }

    #[tokio::test]
    async fn status_reflects_controls() {
        let state = unbounded();
        state.pause();
        state.set_end_reason(RunEndReason::OperatorStop).await;
        let status = state.status(7, 12, -3).await;
        assert_eq!(status.tick, 7);
        assert_eq!(status.entries, 12);
        assert_eq!(status.score, -3);
        assert!(status.paused);
        assert_eq!(status.end_reason, Some(RunEndReason::OperatorStop));
        assert_eq!(status.tick_interval_ms, 1000);
    }
}
