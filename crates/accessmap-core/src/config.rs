use crate::error::{AccessMapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

pub const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 4 * 60 * 60;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_RECENCY_WINDOW_HOURS: u64 = 24;
pub const DEFAULT_MAX_SEARCH_RADIUS_METERS: f64 = 50_000.0;

/// Upper bound for second-valued settings (ten years)
pub const MAX_DURATION_SECS: u64 = 10 * 365 * 24 * 60 * 60;
/// Upper bound for `recency_window_hours` (ten years)
pub const MAX_RECENCY_WINDOW_HOURS: u64 = 10 * 365 * 24;

/// Layered configuration for the recording and discovery engine
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub session_idle_timeout_secs: ConfigValue<u64>,
    pub sweep_interval_secs: ConfigValue<u64>,
    pub recency_window_hours: ConfigValue<u64>,
    pub max_search_radius_meters: ConfigValue<f64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            session_idle_timeout_secs: ConfigValue::new(
                DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
                ConfigSource::Default,
            ),
            sweep_interval_secs: ConfigValue::new(
                DEFAULT_SWEEP_INTERVAL_SECS,
                ConfigSource::Default,
            ),
            recency_window_hours: ConfigValue::new(
                DEFAULT_RECENCY_WINDOW_HOURS,
                ConfigSource::Default,
            ),
            max_search_radius_meters: ConfigValue::new(
                DEFAULT_MAX_SEARCH_RADIUS_METERS,
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AccessMapError::ConfigMissing {
                    key: format!("config file {}", path.display()),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| AccessMapError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(secs) = file_config.session_idle_timeout_secs {
            self.session_idle_timeout_secs
                .update(require_in_range("session_idle_timeout_secs", secs, MAX_DURATION_SECS)?, ConfigSource::File);
        }

        if let Some(secs) = file_config.sweep_interval_secs {
            self.sweep_interval_secs
                .update(require_in_range("sweep_interval_secs", secs, MAX_DURATION_SECS)?, ConfigSource::File);
        }

        if let Some(hours) = file_config.recency_window_hours {
            self.recency_window_hours
                .update(require_in_range("recency_window_hours", hours, MAX_RECENCY_WINDOW_HOURS)?, ConfigSource::File);
        }

        if let Some(radius) = file_config.max_search_radius_meters {
            self.max_search_radius_meters.update(parse_radius(radius)?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Some(secs) = bounded_env("ACCESSMAP_SESSION_IDLE_TIMEOUT_SECS", MAX_DURATION_SECS) {
            self.session_idle_timeout_secs.update(secs, ConfigSource::Environment);
        }

        if let Some(secs) = bounded_env("ACCESSMAP_SWEEP_INTERVAL_SECS", MAX_DURATION_SECS) {
            self.sweep_interval_secs.update(secs, ConfigSource::Environment);
        }

        if let Some(hours) = bounded_env("ACCESSMAP_RECENCY_WINDOW_HOURS", MAX_RECENCY_WINDOW_HOURS) {
            self.recency_window_hours.update(hours, ConfigSource::Environment);
        }

        if let Ok(radius_str) = env::var("ACCESSMAP_MAX_SEARCH_RADIUS_METERS") {
            match radius_str.parse::<f64>().ok().filter(|r| parse_radius(*r).is_ok()) {
                Some(radius) => {
                    self.max_search_radius_meters.update(radius, ConfigSource::Environment)
                }
                None => tracing::warn!(
                    "Invalid ACCESSMAP_MAX_SEARCH_RADIUS_METERS value '{}': expected a positive number of meters",
                    radius_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(secs) = overrides.session_idle_timeout_secs.filter(|s| in_range(*s, MAX_DURATION_SECS)) {
            self.session_idle_timeout_secs.update(secs, ConfigSource::Cli);
        }

        if let Some(secs) = overrides.sweep_interval_secs.filter(|s| in_range(*s, MAX_DURATION_SECS)) {
            self.sweep_interval_secs.update(secs, ConfigSource::Cli);
        }

        if let Some(hours) = overrides.recency_window_hours.filter(|h| in_range(*h, MAX_RECENCY_WINDOW_HOURS)) {
            self.recency_window_hours.update(hours, ConfigSource::Cli);
        }

        if let Some(radius) = overrides.max_search_radius_meters.and_then(|r| parse_radius(r).ok())
        {
            self.max_search_radius_meters.update(radius, ConfigSource::Cli);
        }
    }

    /// Idle period after which a session may be force-discarded
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs.value)
    }

    /// Period of the background expiry sweep
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.value)
    }

    /// Window within which a vote counts as recent
    ///
    /// Saturates rather than overflowing if the field was set out of range.
    pub fn recency_window(&self) -> chrono::Duration {
        i64::try_from(self.recency_window_hours.value)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "session_idle_timeout_secs".to_string(),
            (
                self.session_idle_timeout_secs.value.to_string(),
                self.session_idle_timeout_secs.source,
            ),
        );

        map.insert(
            "sweep_interval_secs".to_string(),
            (self.sweep_interval_secs.value.to_string(), self.sweep_interval_secs.source),
        );

        map.insert(
            "recency_window_hours".to_string(),
            (self.recency_window_hours.value.to_string(), self.recency_window_hours.source),
        );

        map.insert(
            "max_search_radius_meters".to_string(),
            (
                format!("{}", self.max_search_radius_meters.value),
                self.max_search_radius_meters.source,
            ),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    session_idle_timeout_secs: Option<u64>,
    sweep_interval_secs: Option<u64>,
    recency_window_hours: Option<u64>,
    max_search_radius_meters: Option<f64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub session_idle_timeout_secs: Option<u64>,
    pub sweep_interval_secs: Option<u64>,
    pub recency_window_hours: Option<u64>,
    pub max_search_radius_meters: Option<f64>,
}

fn in_range(value: u64, max: u64) -> bool {
    (1..=max).contains(&value)
}

fn require_in_range(key: &str, value: u64, max: u64) -> Result<u64> {
    if !in_range(value, max) {
        return Err(AccessMapError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("must be between 1 and {}", max),
        });
    }
    Ok(value)
}

fn bounded_env(var: &str, max: u64) -> Option<u64> {
    let raw = env::var(var).ok()?;
    match raw.parse::<u64>() {
        Ok(value) if in_range(value, max) => Some(value),
        _ => {
            tracing::warn!("Invalid {} value '{}': expected an integer between 1 and {}", var, raw, max);
            None
        }
    }
}

/// Parse a maximum search radius, rejecting non-positive or non-finite values
pub fn parse_radius(radius: f64) -> Result<f64> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(AccessMapError::ConfigInvalid {
            key: "max_search_radius_meters".to_string(),
            reason: format!("Invalid radius: {}. Use a positive number of meters", radius),
        });
    }
    Ok(radius)
}
