//! Sentibeat binary.
//!
//! Wires the timeline engine to the operator controls and the HTTP /
//! `WebSocket` server, then drives the feed until a bound is reached,
//! the operator stops it, or Ctrl-C is pressed.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `sentibeat-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the article pool, generator and engine (seeded log, tick 0)
//! 4. Create operator state from the configured interval and bounds
//! 5. Start the timeline server
//! 6. Run the tick loop
//! 7. Log the result

mod error;
mod observer_callback;

use std::path::Path;
use std::sync::Arc;

use sentibeat_core::catalog::ArticlePool;
use sentibeat_core::config::{LoggingConfig, TimelineConfig};
use sentibeat_core::engine::TimelineEngine;
use sentibeat_core::generator::RandomEventGenerator;
use sentibeat_core::operator::OperatorState;
use sentibeat_core::runner;
use sentibeat_observer::server::ServerConfig;
use sentibeat_observer::startup::spawn_observer;
use sentibeat_observer::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;
use crate::observer_callback::ObserverCallback;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "sentibeat-config.yaml";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Configuration.
    let (config, loaded_from_file) = load_config(Path::new(CONFIG_PATH))?;

    // 2. Logging.
    init_logging(&config.logging)?;
    info!("sentibeat starting");
    if !loaded_from_file {
        info!(path = CONFIG_PATH, "Config file not found, using defaults");
    }
    info!(
        max_entries = config.timeline.max_entries,
        seed_count = config.timeline.seed_count,
        tick_interval_ms = config.timeline.tick_interval_ms,
        rng_seed = ?config.timeline.rng_seed,
        "Configuration loaded"
    );

    // 3. Engine.
    let pool = ArticlePool::builtin();
    let generator = RandomEventGenerator::new(pool.clone(), config.timeline.rng_seed);
    let mut engine = TimelineEngine::new(&config, &pool, generator)?;

    // 4. Operator controls.
    let operator = Arc::new(OperatorState::new(
        config.timeline.tick_interval_ms,
        &config.bounds,
    ));
    info!(
        max_ticks = operator.max_ticks(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = operator.tick_interval_ms(),
        "Operator state initialized"
    );

    // 5. Timeline server, seeded with the tick-0 view.
    let app_state = Arc::new(
        AppState::with_operator(Arc::clone(&operator))
            .with_favicon(config.favicon.clone())
            .with_view(engine.view().clone()),
    );
    let server_config = ServerConfig::from(&config.observer);
    let server = spawn_observer(&server_config, Arc::clone(&app_state)).await?;

    {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping feed");
                    operator.request_stop();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    // 6. Run.
    let mut callback = ObserverCallback::new(app_state);
    let result = runner::run_timeline(&mut engine, &operator, &mut callback).await?;

    // 7. Report.
    runner::log_run_end(&result);
    server.abort();
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "sentibeat shutdown complete"
    );

    Ok(())
}

/// Load configuration, falling back to defaults when `path` is missing.
///
/// Returns the config and whether it came from the file.
fn load_config(path: &Path) -> Result<(TimelineConfig, bool), AppError> {
    if path.exists() {
        return Ok((TimelineConfig::from_file(path)?, true));
    }
    let mut config = TimelineConfig::default();
    config.observer.apply_env_overrides();
    Ok((config, false))
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_logging(logging: &LoggingConfig) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|e| AppError::LogFilter {
            filter: logging.level.clone(),
            message: e.to_string(),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
