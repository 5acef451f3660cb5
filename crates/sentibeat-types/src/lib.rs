//! Shared type definitions for the Sentibeat sentiment timeline.
//!
//! This crate is the single source of truth for every value that crosses
//! the engine/renderer boundary. Types flow downstream to `TypeScript` via
//! `ts-rs` so the rendering layer can consume snapshots without redeclaring
//! them.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for event identifiers
//! - [`enums`] -- The source registry and sentiment polarity
//! - [`structs`] -- Events, derived entries, plot points and geometry
//! - [`view`] -- The per-tick snapshot handed to renderers

pub mod enums;
pub mod ids;
pub mod structs;
pub mod view;

// Re-export all public types at crate root for convenience.
pub use enums::{InvalidSentiment, Sentiment, SourceId};
pub use ids::EventId;
pub use structs::{Article, Event, PlotPoint, Point, Scoreboard, Segment, Source, TimelineEntry};
pub use view::{Baseline, FeedItem, Thumbnail, TimelineView};
