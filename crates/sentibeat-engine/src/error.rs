//! Error types for the Sentibeat binary.

/// Top-level error for the binary. Each variant wraps one subsystem.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: sentibeat_core::config::ConfigError,
    },

    /// The engine rejected the configuration.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: sentibeat_core::engine::EngineError,
    },

    /// The tick loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: sentibeat_core::runner::RunnerError,
    },

    /// The timeline server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: sentibeat_observer::startup::StartupError,
    },

    /// The logging filter could not be built.
    #[error("invalid log filter `{filter}`: {message}")]
    LogFilter {
        /// The rejected filter directive.
        filter: String,
        /// Parser message.
        message: String,
    },
}
