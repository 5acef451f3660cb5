//! The derived snapshot handed to the rendering layer each tick.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::SourceId;
use crate::ids::EventId;
use crate::structs::{PlotPoint, Point, Scoreboard, Segment};

/// The dashed zero-score reference line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Baseline {
    /// Left end.
    pub from: Point,
    /// Right end.
    pub to: Point,
}

/// A clickable thumbnail square, positioned in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Thumbnail {
    /// Event this thumbnail represents.
    pub id: EventId,
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Side length.
    pub size: f64,
    /// Hover title.
    pub title: String,
    /// Link target.
    pub url: String,
    /// Source favicon image.
    pub favicon_url: String,
    /// Border and glow polarity.
    pub positive: bool,
}

/// A card in the latest-first feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeedItem {
    /// Event this card represents.
    pub id: EventId,
    /// Headline.
    pub title: String,
    /// Link target.
    pub url: String,
    /// Publishing source.
    pub source: SourceId,
    /// Source label shown under the headline.
    pub source_label: String,
    /// Source favicon image.
    pub favicon_url: String,
    /// Up or down marker.
    pub positive: bool,
}

/// A fully derived, internally consistent snapshot of the timeline.
///
/// Readers only ever see complete snapshots; the engine replaces the whole
/// value on each tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimelineView {
    /// Number of ticks applied since the seed log was loaded.
    #[ts(type = "number")]
    pub tick: u64,
    /// Entries in log order, projected to plot coordinates.
    pub points: Vec<PlotPoint>,
    /// Tally of the whole window.
    pub scoreboard: Scoreboard,
    /// SVG path of the gain/loss area, absent below two points.
    ///
    /// In plot coordinates: renderers offset it by the vertical padding.
    pub area_path: Option<String>,
    /// Connectors between consecutive points, in canvas coordinates.
    pub segments: Vec<Segment>,
    /// Zero line, absent for an empty log.
    pub baseline: Option<Baseline>,
    /// Thumbnail squares, in canvas coordinates.
    pub thumbnails: Vec<Thumbnail>,
    /// Newest-first feed cards.
    pub feed: Vec<FeedItem>,
    /// Total canvas width.
    pub width: f64,
    /// Total canvas height, including vertical padding.
    pub height: f64,
    /// Plot-space y of the zero line.
    pub center_y: f64,
}

impl TimelineView {
    /// Number of entries in the window.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find a point by event identifier.
    pub fn point(&self, id: EventId) -> Option<&PlotPoint> {
        self.points.iter().find(|p| p.entry.event.id == id)
    }

    /// The newest point, if any.
    pub fn latest(&self) -> Option<&PlotPoint> {
        self.points.last()
    }
}
