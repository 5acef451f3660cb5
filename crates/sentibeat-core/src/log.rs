//! Append-only, capacity-bounded event log.
//!
//! The log never mutates in place: every append produces a new sequence.
//! When the log is at capacity the single oldest event is evicted before
//! the new one is appended, so survivors keep their relative order.

use sentibeat_types::{Event, EventId};

/// Errors that can occur when constructing an [`EventLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// A log must be able to hold at least one event.
    #[error("log capacity must be at least 1")]
    ZeroCapacity,
}

/// Append `event` to `log`, evicting the oldest entry when `log` already
/// holds `max_size` or more events.
///
/// Returns a new sequence; the input is left untouched. When `log` is
/// already over capacity only the single oldest entry is dropped.
pub fn append(log: &[Event], event: Event, max_size: usize) -> Vec<Event> {
    let survivors = if log.len() >= max_size {
        log.get(1..).unwrap_or_default()
    } else {
        log
    };
    let mut next = Vec::with_capacity(survivors.len().saturating_add(1));
    next.extend_from_slice(survivors);
    next.push(event);
    next
}

/// An ordered event log with a fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
    capacity: usize,
}

impl EventLog {
    /// Create an empty log.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::ZeroCapacity`] if `capacity` is 0.
    pub const fn new(capacity: usize) -> Result<Self, LogError> {
        if capacity == 0 {
            return Err(LogError::ZeroCapacity);
        }
        Ok(Self {
            events: Vec::new(),
            capacity,
        })
    }

    /// Create a log pre-filled with `events`.
    ///
    /// Only the newest `capacity` events are kept.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::ZeroCapacity`] if `capacity` is 0.
    pub fn seeded(mut events: Vec<Event>, capacity: usize) -> Result<Self, LogError> {
        if capacity == 0 {
            return Err(LogError::ZeroCapacity);
        }
        let excess = events.len().saturating_sub(capacity);
        events.drain(..excess);
        Ok(Self { events, capacity })
    }

    /// A new log with `event` appended, evicting the oldest when full.
    #[must_use]
    pub fn appended(&self, event: Event) -> Self {
        Self {
            events: append(&self.events, event, self.capacity),
            capacity: self.capacity,
        }
    }

    /// Events in log order, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Maximum number of retained events.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether an event with this identifier is retained.
    pub fn contains(&self, id: EventId) -> bool {
        self.events.iter().any(|e| e.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sentibeat_types::{Sentiment, SourceId};

    use super::*;

    fn event(index: u64, sentiment: Sentiment) -> Event {
        Event {
            id: EventId::seed(index),
            title: format!("event {index}"),
            url: format!("https://example.com/{index}"),
            source: SourceId::Reddit,
            sentiment,
        }
    }

    fn ids(events: &[Event]) -> Vec<EventId> {
        events.iter().map(|e| e.id).collect()
    }

    #[test]
    fn append_below_capacity_keeps_everything() {
        let log = vec![event(0, Sentiment::Positive)];
        let next = append(&log, event(1, Sentiment::Negative), 3);
        assert_eq!(ids(&next), vec![EventId::seed(0), EventId::seed(1)]);
        // Input untouched.
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn append_to_empty_log() {
        let next = append(&[], event(0, Sentiment::Positive), 1);
        assert_eq!(ids(&next), vec![EventId::seed(0)]);
    }

    #[test]
    fn append_at_capacity_evicts_oldest() {
        let log: Vec<Event> = (0..3).map(|i| event(i, Sentiment::Positive)).collect();
        let next = append(&log, event(3, Sentiment::Negative), 3);
        assert_eq!(
            ids(&next),
            vec![EventId::seed(1), EventId::seed(2), EventId::seed(3)]
        );
    }

    #[test]
    fn append_over_capacity_drops_only_one() {
        let log: Vec<Event> = (0..5).map(|i| event(i, Sentiment::Positive)).collect();
        let next = append(&log, event(5, Sentiment::Positive), 3);
        assert_eq!(next.len(), 5);
        assert_eq!(next.first().map(|e| e.id), Some(EventId::seed(1)));
    }

    #[test]
    fn full_log_stays_at_capacity_and_preserves_order() {
        let mut log = EventLog::new(50).unwrap();
        for i in 0..50 {
            log = log.appended(event(i, Sentiment::Negative));
        }
        assert_eq!(log.len(), 50);

        let next = log.appended(event(50, Sentiment::Positive));
        assert_eq!(next.len(), 50);
        assert!(!next.contains(EventId::seed(0)));
        let expected: Vec<EventId> = (1..=50).map(EventId::seed).collect();
        assert_eq!(ids(next.events()), expected);
        // The original log is still intact.
        assert!(log.contains(EventId::seed(0)));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(EventLog::new(0), Err(LogError::ZeroCapacity));
        assert_eq!(EventLog::seeded(Vec::new(), 0), Err(LogError::ZeroCapacity));
    }

    #[test]
    fn oversized_seed_keeps_newest() {
        let seed: Vec<Event> = (0..5).map(|i| event(i, Sentiment::Positive)).collect();
        let log = EventLog::seeded(seed, 2).unwrap();
        assert_eq!(ids(log.events()), vec![EventId::seed(3), EventId::seed(4)]);
        assert_eq!(log.capacity(), 2);
    }
}
