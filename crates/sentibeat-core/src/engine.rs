//! The timeline engine: single owner of the log and its derived view.
//!
//! Each [`TimelineEngine::tick`] is one complete transition:
//!
//! 1. **Append** -- draw one event from the generator and append it,
//!    evicting the oldest when the log is full.
//! 2. **Derive** -- recompute cumulative sums and the scoreboard over the
//!    whole retained window.
//! 3. **Project** -- map entries to plot coordinates.
//! 4. **Build paths** -- area path, connector segments, baseline,
//!    thumbnails and the feed.
//!
//! The new [`TimelineView`] replaces the previous one only once all four
//! steps are done, so readers never observe a partial snapshot.

use sentibeat_types::{Event, FeedItem, TimelineView};
use tracing::{debug, info};

use crate::catalog::{self, ArticlePool, CatalogError};
use crate::config::{FaviconConfig, TimelineConfig};
use crate::derive::{derive_cumulative, derive_scoreboard};
use crate::generator::EventGenerator;
use crate::geometry::{self, Layout, LayoutError};
use crate::log::{EventLog, LogError};

/// Errors that can occur while constructing the engine.
///
/// Ticking itself cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The seed log could not be built from the pool.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },

    /// The configured capacity is invalid.
    #[error("log error: {source}")]
    Log {
        /// The underlying log error.
        #[from]
        source: LogError,
    },

    /// The configured layout is invalid.
    #[error("layout error: {source}")]
    Layout {
        /// The underlying layout error.
        #[from]
        source: LayoutError,
    },
}

/// Owns the event log, the event generator and the latest derived view.
#[derive(Debug)]
pub struct TimelineEngine<G> {
    log: EventLog,
    generator: G,
    layout: Layout,
    favicon: FaviconConfig,
    tick: u64,
    view: TimelineView,
}

impl<G: EventGenerator> TimelineEngine<G> {
    /// Build an engine seeded with the first `seed_count` pool articles.
    ///
    /// The initial view (tick 0) is derived immediately.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the seed count exceeds the pool, the
    /// capacity is zero, or the layout is invalid.
    pub fn new(config: &TimelineConfig, pool: &ArticlePool, generator: G) -> Result<Self, EngineError> {
        let layout = Layout::new(&config.layout)?;
        let seed = pool.seed_events(config.timeline.seed_count)?;
        let log = EventLog::seeded(seed, config.timeline.max_entries)?;
        let favicon = config.favicon.clone();
        let view = derive_view(log.events(), 0, &layout, &favicon);

        info!(
            seeded = log.len(),
            capacity = log.capacity(),
            score = view.scoreboard.score,
            "Timeline engine initialized"
        );

        Ok(Self {
            log,
            generator,
            layout,
            favicon,
            tick: 0,
            view,
        })
    }

    /// Advance one step: append a generated event and rebuild the view.
    pub fn tick(&mut self) -> &TimelineView {
        let event = self.generator.next_event();
        let evicted = (self.log.len() >= self.log.capacity())
            .then(|| self.log.events().first().map(|e| e.id))
            .flatten();

        let (id, source, sentiment) = (event.id, event.source, event.sentiment.value());
        let log = self.log.appended(event);
        let tick = self.tick.saturating_add(1);
        let view = derive_view(log.events(), tick, &self.layout, &self.favicon);

        self.log = log;
        self.tick = tick;
        self.view = view;

        debug!(
            tick,
            %id,
            %source,
            sentiment,
            evicted = ?evicted,
            entries = self.view.len(),
            score = self.view.scoreboard.score,
            "Tick applied"
        );

        &self.view
    }
}

impl<G> TimelineEngine<G> {
    /// The latest complete snapshot.
    pub const fn view(&self) -> &TimelineView {
        &self.view
    }

    /// The retained event log.
    pub const fn log(&self) -> &EventLog {
        &self.log
    }

    /// Number of ticks applied so far.
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// The validated chart layout.
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Favicon settings used for thumbnails and feed cards.
    pub const fn favicon(&self) -> &FaviconConfig {
        &self.favicon
    }
}

/// Run the full derive/project/build pipeline over a log.
pub fn derive_view(
    events: &[Event],
    tick: u64,
    layout: &Layout,
    favicon: &FaviconConfig,
) -> TimelineView {
    let entries = derive_cumulative(events);
    let scoreboard = derive_scoreboard(events);
    let points = layout.project(&entries);

    let center_y = layout.center_y();
    let plot: Vec<_> = points.iter().map(|p| p.position()).collect();
    let area_path = geometry::build_area_path(&plot, center_y).map(|area| area.to_svg());
    let canvas: Vec<_> = plot.iter().map(|&p| layout.to_canvas(p)).collect();
    let segments = geometry::build_segments(&canvas);

    let thumbnails = layout.thumbnails(&points, favicon);
    let feed = events.iter().rev().map(|e| feed_item(e, favicon)).collect();

    TimelineView {
        tick,
        baseline: layout.baseline(points.len()),
        width: layout.chart_width(points.len()),
        height: layout.canvas_height(),
        center_y,
        points,
        scoreboard,
        area_path,
        segments,
        thumbnails,
        feed,
    }
}

fn feed_item(event: &Event, favicon: &FaviconConfig) -> FeedItem {
    FeedItem {
        id: event.id,
        title: event.title.clone(),
        url: event.url.clone(),
        source: event.source,
        source_label: event.source.label().to_owned(),
        favicon_url: catalog::source_favicon(event.source, favicon),
        positive: event.sentiment.is_positive(),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::arithmetic_side_effects
)]
mod tests {
    use std::collections::BTreeSet;

    use sentibeat_types::{EventId, Scoreboard};

    use super::*;
    use crate::config::TimelineSettings;
    use crate::generator::{RandomEventGenerator, ScriptedEventGenerator};

    fn config(max_entries: usize, seed_count: usize) -> TimelineConfig {
        TimelineConfig {
            timeline: TimelineSettings {
                max_entries,
                seed_count,
                ..TimelineSettings::default()
            },
            ..TimelineConfig::default()
        }
    }

    fn scripted() -> ScriptedEventGenerator {
        ScriptedEventGenerator::new(ArticlePool::builtin())
    }

    fn cumulative(view: &TimelineView) -> Vec<i32> {
        view.points.iter().map(|p| p.entry.cumulative).collect()
    }

    #[test]
    fn initial_view_reflects_seed_prefix() {
        let pool = ArticlePool::builtin();
        let engine = TimelineEngine::new(&TimelineConfig::default(), &pool, scripted()).unwrap();
        let view = engine.view();

        assert_eq!(view.tick, 0);
        assert_eq!(cumulative(view), vec![1, 0, 1, 0, 1]);
        assert_eq!(
            view.scoreboard,
            Scoreboard {
                score: 1,
                positive: 3,
                negative: 2
            }
        );
        assert!(view.area_path.is_some());
        assert_eq!(view.segments.len(), 4);
        assert_eq!(view.thumbnails.len(), 5);
        assert_eq!(view.width, 640.0);
        assert_eq!(view.height, 400.0);
        assert_eq!(view.center_y, 140.0);
    }

    #[test]
    fn tick_appends_exactly_one_event() {
        let pool = ArticlePool::builtin();
        let mut engine = TimelineEngine::new(&TimelineConfig::default(), &pool, scripted()).unwrap();
        let view = engine.tick();
        assert_eq!(view.tick, 1);
        assert_eq!(view.len(), 6);
        // The scripted generator starts with the first article (+1).
        assert_eq!(cumulative(view), vec![1, 0, 1, 0, 1, 2]);
        assert_eq!(engine.tick_count(), 1);
        assert_eq!(engine.log().len(), 6);
    }

    #[test]
    fn feed_is_newest_first() {
        let pool = ArticlePool::builtin();
        let mut engine = TimelineEngine::new(&TimelineConfig::default(), &pool, scripted()).unwrap();
        engine.tick();
        let view = engine.view();
        assert_eq!(view.feed.first().map(|f| f.id), Some(EventId::scripted(0)));
        assert_eq!(view.feed.last().map(|f| f.id), Some(EventId::seed(0)));
        assert_eq!(view.feed.first().map(|f| f.source_label.as_str()), Some("X"));
    }

    #[test]
    fn log_stays_bounded_and_rebases() {
        let pool = ArticlePool::builtin();
        let mut engine = TimelineEngine::new(&config(6, 5), &pool, scripted()).unwrap();
        engine.tick(); // len 6
        let view = engine.tick().clone(); // evicts seed-0 (+1)

        assert_eq!(view.len(), 6);
        assert!(view.point(EventId::seed(0)).is_none());
        // Oldest survivor is seed-1 (-1): baseline restarts there.
        assert_eq!(view.points.first().map(|p| p.entry.cumulative), Some(-1));
        let sum: i64 = engine.log().events().iter().map(|e| i64::from(e.sentiment.value())).sum();
        assert_eq!(view.scoreboard.score, sum);
    }

    #[test]
    fn invariants_hold_over_many_ticks() {
        let pool = ArticlePool::builtin();
        let generator = RandomEventGenerator::new(pool.clone(), Some(2024));
        let mut engine = TimelineEngine::new(&TimelineConfig::default(), &pool, generator).unwrap();

        for _ in 0..120 {
            let view = engine.tick().clone();
            assert!(view.len() <= 50);

            let mut previous = 0;
            for point in &view.points {
                assert_eq!(point.entry.cumulative, previous + point.entry.event.sentiment.value());
                previous = point.entry.cumulative;
            }
            assert_eq!(
                view.scoreboard.score,
                i64::from(view.scoreboard.positive) - i64::from(view.scoreboard.negative)
            );
            assert_eq!(view.segments.len(), view.len().saturating_sub(1));
            assert_eq!(view.feed.len(), view.len());

            let ids: BTreeSet<EventId> = view.points.iter().map(|p| p.entry.event.id).collect();
            assert_eq!(ids.len(), view.len());
        }
        assert_eq!(engine.view().len(), 50);
        assert_eq!(engine.tick_count(), 120);
    }

    #[test]
    fn segments_are_in_canvas_space() {
        let pool = ArticlePool::builtin();
        let engine = TimelineEngine::new(&TimelineConfig::default(), &pool, scripted()).unwrap();
        let view = engine.view();
        let first = view.segments.first().unwrap();
        let point = view.points.first().unwrap();
        assert_eq!(first.from.x, point.x);
        assert_eq!(first.from.y, point.y + 60.0);
    }

    #[test]
    fn empty_seed_yields_no_geometry_until_two_points() {
        let pool = ArticlePool::builtin();
        let mut engine = TimelineEngine::new(&config(50, 0), &pool, scripted()).unwrap();
        assert!(engine.view().is_empty());
        assert!(engine.view().baseline.is_none());
        assert!(engine.view().area_path.is_none());

        let view = engine.tick();
        assert_eq!(view.len(), 1);
        assert!(view.area_path.is_none());
        assert!(view.segments.is_empty());
        assert!(view.baseline.is_some());

        let view = engine.tick();
        assert!(view.area_path.is_some());
        assert_eq!(view.segments.len(), 1);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let pool = ArticlePool::builtin();
        assert!(matches!(
            TimelineEngine::new(&config(0, 0), &pool, scripted()),
            Err(EngineError::Log { .. })
        ));
        assert!(matches!(
            TimelineEngine::new(&config(50, 11), &pool, scripted()),
            Err(EngineError::Catalog { .. })
        ));
    }
}
