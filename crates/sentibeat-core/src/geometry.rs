//! Coordinate projection and path construction for the timeline chart.
//!
//! Plot coordinates put the zero-score baseline at `center_y` and grow
//! downward, so a rising cumulative score moves a point up. Canvas
//! coordinates add the vertical padding on top of the plot area; the area
//! path stays in plot coordinates while thumbnails and connector segments
//! are handed out in canvas coordinates.

use core::fmt;

use sentibeat_types::{Baseline, PlotPoint, Point, Segment, Thumbnail, TimelineEntry};

use crate::catalog;
use crate::config::{FaviconConfig, LayoutConfig};

/// Errors from validating a [`LayoutConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// A dimension that must be strictly positive was not.
    #[error("layout field `{field}` must be finite and greater than zero, got {value}")]
    NotPositive {
        /// Config field name.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// A dimension that must be non-negative was not.
    #[error("layout field `{field}` must be finite and non-negative, got {value}")]
    Negative {
        /// Config field name.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Validated chart layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    spacing: f64,
    thumb_size: f64,
    chart_height: f64,
    padding_x: f64,
    padding_y: f64,
    y_scale: f64,
}

impl Layout {
    /// Validate layout constants.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when spacing, chart height or y scale is not
    /// strictly positive, or when a padding or the thumbnail size is
    /// negative. Non-finite values are always rejected.
    pub fn new(config: &LayoutConfig) -> Result<Self, LayoutError> {
        Ok(Self {
            spacing: positive("point_spacing", config.point_spacing)?,
            thumb_size: non_negative("thumb_size", config.thumb_size)?,
            chart_height: positive("chart_height", config.chart_height)?,
            padding_x: non_negative("padding_x", config.padding_x)?,
            padding_y: non_negative("padding_y", config.padding_y)?,
            y_scale: positive("y_scale", config.y_scale)?,
        })
    }

    /// Plot-space y of the zero-score baseline.
    pub fn center_y(&self) -> f64 {
        self.chart_height / 2.0
    }

    /// Horizontal padding.
    pub const fn padding_x(&self) -> f64 {
        self.padding_x
    }

    /// Vertical padding.
    pub const fn padding_y(&self) -> f64 {
        self.padding_y
    }

    /// Thumbnail side length.
    pub const fn thumb_size(&self) -> f64 {
        self.thumb_size
    }

    /// Full canvas height: the plot area plus padding above and below.
    pub fn canvas_height(&self) -> f64 {
        self.padding_y.mul_add(2.0, self.chart_height)
    }

    /// Full canvas width for `count` points.
    pub fn chart_width(&self, count: usize) -> f64 {
        let gaps = index_to_f64(count.saturating_sub(1));
        self.padding_x.mul_add(2.0, gaps * self.spacing)
    }

    /// Project entries with this layout's constants.
    pub fn project(&self, entries: &[TimelineEntry]) -> Vec<PlotPoint> {
        project(
            entries,
            self.spacing,
            self.padding_x,
            self.center_y(),
            self.y_scale,
        )
    }

    /// The zero line for a window of `count` points, absent when empty.
    pub fn baseline(&self, count: usize) -> Option<Baseline> {
        if count == 0 {
            return None;
        }
        let y = self.center_y();
        Some(Baseline {
            from: Point {
                x: self.padding_x,
                y,
            },
            to: Point {
                x: self.chart_width(count) - self.padding_x,
                y,
            },
        })
    }

    /// Shift a plot-space point into canvas space.
    pub fn to_canvas(&self, point: Point) -> Point {
        Point {
            x: point.x,
            y: point.y + self.padding_y,
        }
    }

    /// Thumbnail squares centred on each point, in canvas space.
    pub fn thumbnails(&self, points: &[PlotPoint], favicon: &FaviconConfig) -> Vec<Thumbnail> {
        let half = self.thumb_size / 2.0;
        points
            .iter()
            .map(|point| {
                let centre = self.to_canvas(point.position());
                let event = &point.entry.event;
                Thumbnail {
                    id: event.id,
                    left: centre.x - half,
                    top: centre.y - half,
                    size: self.thumb_size,
                    title: event.title.clone(),
                    url: event.url.clone(),
                    favicon_url: catalog::source_favicon(event.source, favicon),
                    positive: event.sentiment.is_positive(),
                }
            })
            .collect()
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::Negative { field, value })
    }
}

fn index_to_f64(index: usize) -> f64 {
    f64::from(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Map entries to plot coordinates.
///
/// `x_i = padding_x + i * spacing` and `y_i = center_y - cumulative_i * y_scale`.
pub fn project(
    entries: &[TimelineEntry],
    spacing: f64,
    padding_x: f64,
    center_y: f64,
    y_scale: f64,
) -> Vec<PlotPoint> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| PlotPoint {
            entry: entry.clone(),
            x: index_to_f64(i).mul_add(spacing, padding_x),
            y: f64::from(entry.cumulative).mul_add(-y_scale, center_y),
        })
        .collect()
}

/// A closed region between the baseline and the polyline through the
/// points.
///
/// Vertices run left to right along the baseline, up to the last point,
/// then back right to left through the remaining points.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaPath {
    vertices: Vec<Point>,
}

impl AreaPath {
    /// Vertices in drawing order. The shape closes back to the first.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// The path as an SVG `d` attribute.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AreaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.vertices.iter().enumerate() {
            let command = if i == 0 { "M" } else { " L" };
            write!(f, "{command} {} {}", v.x, v.y)?;
        }
        f.write_str(" Z")
    }
}

/// Build the gain/loss area. `None` for fewer than two points.
pub fn build_area_path(points: &[Point], center_y: f64) -> Option<AreaPath> {
    let [first, .., last] = points else {
        return None;
    };
    let mut vertices = Vec::with_capacity(points.len().saturating_add(2));
    vertices.push(Point {
        x: first.x,
        y: center_y,
    });
    vertices.push(Point {
        x: last.x,
        y: center_y,
    });
    vertices.extend(points.iter().rev().copied());
    Some(AreaPath { vertices })
}

/// Connector segments between consecutive points. Empty below two points.
pub fn build_segments(points: &[Point]) -> Vec<Segment> {
    points
        .windows(2)
        .filter_map(|pair| match pair {
            [from, to] => {
                let dx = to.x - from.x;
                let dy = to.y - from.y;
                Some(Segment {
                    from: *from,
                    to: *to,
                    length: dx.hypot(dy),
                    angle_deg: dy.atan2(dx).to_degrees(),
                })
            }
            _ => None,
        })
        .collect()
}

/// Horizontal scroll that keeps the newest point in view.
///
/// Zero while the chart fits inside the viewport.
pub fn scroll_offset(chart_width: f64, viewport_width: f64) -> f64 {
    if chart_width > viewport_width {
        chart_width - viewport_width
    } else {
        0.0
    }
}
