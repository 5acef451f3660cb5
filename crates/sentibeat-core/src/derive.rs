//! Cumulative score and scoreboard derivation.
//!
//! Both derivations are recomputed from scratch over the current window.
//! After an eviction the running sum restarts at the oldest surviving
//! entry, so the plotted curve is always anchored at the left edge of the
//! visible window.

use sentibeat_types::{Event, Scoreboard, TimelineEntry};

/// Attach the running sentiment sum to every event, in log order.
///
/// `cumulative[0] == sentiment[0]` and
/// `cumulative[i] == cumulative[i - 1] + sentiment[i]`.
pub fn derive_cumulative(events: &[Event]) -> Vec<TimelineEntry> {
    events
        .iter()
        .scan(0_i32, |running, event| {
            *running = running.saturating_add(event.sentiment.value());
            Some(TimelineEntry {
                event: event.clone(),
                cumulative: *running,
            })
        })
        .collect()
}

/// Tally positive and negative events over the whole window.
pub fn derive_scoreboard(events: &[Event]) -> Scoreboard {
    let (positive, negative) = events.iter().fold((0_u32, 0_u32), |(pos, neg), event| {
        if event.sentiment.is_positive() {
            (pos.saturating_add(1), neg)
        } else {
            (pos, neg.saturating_add(1))
        }
    });
    Scoreboard {
        score: i64::from(positive).saturating_sub(i64::from(negative)),
        positive,
        negative,
    }
}
