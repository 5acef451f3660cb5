//! Core entity structs for the Sentibeat timeline.
//!
//! [`Event`] is immutable once created. [`TimelineEntry`] and [`PlotPoint`]
//! are derived from the log on every tick and never mutated in place.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Sentiment, SourceId};
use crate::ids::EventId;

/// A sample article in the synthetic event pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Article {
    /// Headline shown on hover and in the feed.
    pub title: String,
    /// Link target for the thumbnail and feed card.
    pub url: String,
    /// Publishing source.
    pub source: SourceId,
    /// Polarity of the article.
    #[ts(type = "number")]
    pub sentiment: Sentiment,
}

/// One entry in the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Unique within the retained window.
    pub id: EventId,
    /// Headline.
    pub title: String,
    /// Link target.
    pub url: String,
    /// Publishing source.
    pub source: SourceId,
    /// Polarity, `1` or `-1` on the wire.
    #[ts(type = "number")]
    pub sentiment: Sentiment,
}

impl Event {
    /// Stamp an article with an identifier.
    pub fn from_article(article: &Article, id: EventId) -> Self {
        Self {
            id,
            title: article.title.clone(),
            url: article.url.clone(),
            source: article.source,
            sentiment: article.sentiment,
        }
    }
}

/// An [`Event`] plus its running score within the current window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimelineEntry {
    /// The underlying event.
    #[serde(flatten)]
    pub event: Event,
    /// Sum of sentiment over the window up to and including this entry.
    pub cumulative: i32,
}

/// A [`TimelineEntry`] placed in plot coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlotPoint {
    /// The derived entry.
    #[serde(flatten)]
    pub entry: TimelineEntry,
    /// Horizontal position, strictly increasing with index.
    pub x: f64,
    /// Vertical position, smaller for higher cumulative scores.
    pub y: f64,
}

impl PlotPoint {
    /// The position of this point.
    pub const fn position(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

/// Tally of the whole log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Scoreboard {
    /// `positive - negative`.
    #[ts(type = "number")]
    pub score: i64,
    /// Number of positive events.
    pub positive: u32,
    /// Number of negative events.
    pub negative: u32,
}

impl Scoreboard {
    /// Whether the score reads as a gain (zero counts as a gain).
    pub const fn is_non_negative(&self) -> bool {
        self.score >= 0
    }

    /// Score formatted for the readout: `+3`, `+0`, `-2`.
    pub fn score_label(&self) -> String {
        if self.is_non_negative() {
            format!("+{}", self.score)
        } else {
            self.score.to_string()
        }
    }
}

/// A 2-D coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
}

/// A connector between two consecutive plot points.
///
/// Carries enough for a renderer to draw a rotated bar anchored at `from`
/// without doing its own trigonometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Segment {
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
    /// Euclidean length.
    pub length: f64,
    /// `atan2(dy, dx)` in degrees.
    pub angle_deg: f64,
}

/// Display metadata for a source, resolved from [`SourceId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Source {
    /// Registry key.
    pub id: SourceId,
    /// Display label.
    pub label: String,
    /// Legend color.
    pub color: String,
    /// Favicon domain.
    pub domain: String,
    /// Resolved favicon image URL.
    pub favicon_url: String,
}
