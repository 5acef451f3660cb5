//! Event log, derivation, chart geometry and the tick runner for Sentibeat.
//!
//! Every tick appends one synthetic event to a bounded log, recomputes the
//! cumulative sentiment curve and scoreboard over the retained window, and
//! projects the result to chart coordinates.
//!
//! # Modules
//!
//! - [`catalog`] -- Built-in article pool, seed events and source metadata.
//! - [`config`] -- Configuration loading from `sentibeat-config.yaml`.
//! - [`log`] -- The capacity-bounded, append-only event log.
//! - [`derive`] -- Cumulative sums and the scoreboard.
//! - [`geometry`] -- Projection, area path, segments and layout.
//! - [`generator`] -- [`EventGenerator`] trait and the random generator.
//! - [`engine`] -- [`TimelineEngine`], the single owner of log and view.
//! - [`operator`] -- Shared pause/resume/speed/stop controls.
//! - [`runner`] -- [`run_timeline`], the periodic trigger.
//!
//! [`EventGenerator`]: generator::EventGenerator
//! [`TimelineEngine`]: engine::TimelineEngine
//! [`run_timeline`]: runner::run_timeline

pub mod catalog;
pub mod config;
pub mod derive;
pub mod engine;
pub mod generator;
pub mod geometry;
pub mod log;
pub mod operator;
pub mod runner;
