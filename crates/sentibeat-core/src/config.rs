//! Configuration loading and typed config structures for the timeline.
//!
//! The canonical configuration lives in `sentibeat-config.yaml` in the
//! working directory. Every field has a default matching the reference
//! layout, so an empty or missing file yields a runnable engine.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::operator::MIN_TICK_INTERVAL_MS;

/// Environment variable overriding [`ObserverConfig::port`].
pub const OBSERVER_PORT_ENV: &str = "SENTIBEAT_OBSERVER_PORT";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for `{field}`: {message}")]
    Invalid {
        /// Dotted path of the offending key.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `sentibeat-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TimelineConfig {
    /// Log capacity, seeding and tick cadence.
    #[serde(default)]
    pub timeline: TimelineSettings,

    /// Chart layout constants.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Favicon provider settings.
    #[serde(default)]
    pub favicon: FaviconConfig,

    /// Observer API bind settings.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Run boundaries.
    #[serde(default)]
    pub bounds: BoundsConfig,
}

impl TimelineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `SENTIBEAT_OBSERVER_PORT` overrides `observer.port`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml maps an empty document to unit, not to an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.observer.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `timeline.tick_interval_ms` is
    /// below [`MIN_TICK_INTERVAL_MS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval = self.timeline.tick_interval_ms;
        if interval < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::Invalid {
                field: "timeline.tick_interval_ms",
                message: format!("{interval} is below the {MIN_TICK_INTERVAL_MS} ms minimum"),
            });
        }
        Ok(())
    }
}

/// Log capacity, seeding and tick cadence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimelineSettings {
    /// Maximum retained events; older events are evicted first.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// How many sample articles pre-seed the log.
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Fixed RNG seed for reproducible runs. Random when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            seed_count: default_seed_count(),
            tick_interval_ms: default_tick_interval_ms(),
            rng_seed: None,
        }
    }
}

/// Chart layout constants, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal distance between consecutive points.
    #[serde(default = "default_point_spacing")]
    pub point_spacing: f64,

    /// Side of a thumbnail square.
    #[serde(default = "default_thumb_size")]
    pub thumb_size: f64,

    /// Height of the plot area, excluding vertical padding.
    #[serde(default = "default_chart_height")]
    pub chart_height: f64,

    /// Space left of the first point and right of the last.
    #[serde(default = "default_padding_x")]
    pub padding_x: f64,

    /// Space above and below the plot area.
    #[serde(default = "default_padding_y")]
    pub padding_y: f64,

    /// Pixels per unit of cumulative score.
    #[serde(default = "default_y_scale")]
    pub y_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            point_spacing: default_point_spacing(),
            thumb_size: default_thumb_size(),
            chart_height: default_chart_height(),
            padding_x: default_padding_x(),
            padding_y: default_padding_y(),
            y_scale: default_y_scale(),
        }
    }
}

/// Favicon provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FaviconConfig {
    /// Base URL of the favicon service.
    #[serde(default = "default_favicon_provider")]
    pub provider_url: String,

    /// Requested icon size in pixels.
    #[serde(default = "default_favicon_size")]
    pub size: u32,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            provider_url: default_favicon_provider(),
            size: default_favicon_size(),
        }
    }
}

/// Observer API bind settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Host address to bind to.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl ObserverConfig {
    /// Apply environment variable overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup.
    ///
    /// An unparseable port is logged and ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(OBSERVER_PORT_ENV) {
            match val.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(e) => warn!(value = %val, error = %e, "ignoring invalid {OBSERVER_PORT_ENV}"),
            }
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Run boundaries. Zero means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BoundsConfig {
    /// Stop after this many ticks.
    #[serde(default)]
    pub max_ticks: u64,

    /// Stop after this many wall-clock seconds.
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_max_entries() -> usize {
    50
}

const fn default_seed_count() -> usize {
    5
}

const fn default_tick_interval_ms() -> u64 {
    2200
}

const fn default_point_spacing() -> f64 {
    120.0
}

const fn default_thumb_size() -> f64 {
    56.0
}

const fn default_chart_height() -> f64 {
    280.0
}

const fn default_padding_x() -> f64 {
    80.0
}

const fn default_padding_y() -> f64 {
    60.0
}

const fn default_y_scale() -> f64 {
    12.0
}

fn default_favicon_provider() -> String {
    "https://www.google.com/s2/favicons".to_owned()
}

const fn default_favicon_size() -> u32 {
    64
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_layout() {
        let config = TimelineConfig::default();
        assert_eq!(config.timeline.max_entries, 50);
        assert_eq!(config.timeline.seed_count, 5);
        assert_eq!(config.timeline.tick_interval_ms, 2200);
        assert!(config.timeline.rng_seed.is_none());
        assert!((config.layout.point_spacing - 120.0).abs() < f64::EPSILON);
        assert!((config.layout.chart_height - 280.0).abs() < f64::EPSILON);
        assert!((config.layout.y_scale - 12.0).abs() < f64::EPSILON);
        assert_eq!(config.favicon.size, 64);
        assert_eq!(config.observer.port, 8080);
        assert_eq!(config.bounds, BoundsConfig::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
timeline:
  max_entries: 20
  seed_count: 3
  tick_interval_ms: 500
  rng_seed: 99

layout:
  point_spacing: 60
  thumb_size: 40
  chart_height: 200
  padding_x: 40
  padding_y: 30
  y_scale: 8

favicon:
  provider_url: "https://icons.example.test/"
  size: 32

observer:
  host: "127.0.0.1"
  port: 9090

logging:
  level: "debug"
  json: true

bounds:
  max_ticks: 10
  max_real_time_seconds: 60
"#;

        let config = TimelineConfig::parse(yaml);
        assert!(config.is_ok(), "parse failed: {config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.timeline.max_entries, 20);
        assert_eq!(config.timeline.seed_count, 3);
        assert_eq!(config.timeline.rng_seed, Some(99));
        assert!((config.layout.point_spacing - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.favicon.provider_url, "https://icons.example.test/");
        assert_eq!(config.observer.host, "127.0.0.1");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.bounds.max_ticks, 10);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "timeline:\n  max_entries: 7\n";
        let config = TimelineConfig::parse(yaml).ok().unwrap_or_default();

        assert_eq!(config.timeline.max_entries, 7);
        // Everything else uses defaults
        assert_eq!(config.timeline.seed_count, 5);
        assert!((config.layout.padding_x - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = TimelineConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn parse_rejects_tick_interval_below_minimum() {
        let config = TimelineConfig::parse("timeline:\n  tick_interval_ms: 0\n");
        assert!(matches!(
            config,
            Err(ConfigError::Invalid {
                field: "timeline.tick_interval_ms",
                ..
            })
        ));
        let config = TimelineConfig::parse("timeline:\n  tick_interval_ms: 99\n");
        assert!(config.is_err());
        let config = TimelineConfig::parse("timeline:\n  tick_interval_ms: 100\n");
        assert!(config.is_ok());
    }

    #[test]
    fn parse_rejects_malformed_yaml() {
        let config = TimelineConfig::parse("timeline: [not, a, map");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn port_override_applies() {
        let mut observer = ObserverConfig::default();
        observer.apply_overrides_from(|key| (key == OBSERVER_PORT_ENV).then(|| "9191".to_owned()));
        assert_eq!(observer.port, 9191);
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let mut observer = ObserverConfig::default();
        observer.apply_overrides_from(|_| Some("not-a-port".to_owned()));
        assert_eq!(observer.port, 8080);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("sentibeat-config.yaml");
        if path.exists() {
            let config = TimelineConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
