//! Timeline API server for Sentibeat.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/timeline`) pushing every tick's full
//!   [`TimelineView`] via [`tokio::sync::broadcast`]
//! - **REST endpoints** for the current timeline, its auto-scroll offset,
//!   the scoreboard, feed, source legend and single entries
//! - **Operator REST endpoints** for pausing, resuming, re-timing and
//!   stopping the feed
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! Reads are served from an in-memory snapshot that the engine replaces
//! after each tick, so handlers never touch the engine directly.
//! `WebSocket` clients that fall behind skip to the newest view.
//!
//! [`TimelineView`]: sentibeat_types::TimelineView

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{ServerConfig, ServerError};
pub use state::AppState;
