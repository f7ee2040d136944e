//! Configuration file support for Polymet.
//!
//! This module provides serialization and deserialization of dashboard
//! settings: canvas geometry, the timeline domain, sample fetching and the
//! classification sources available at startup.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{canvas, samples, timeline, DEFAULT_SOURCE_LABEL};
use crate::model::{default_rules, ClassificationRule, ClassificationSource, MetricField, SourceId};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Dashboard configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Canvas geometry
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Time range domain and initial selection
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Sample fetching
    #[serde(default)]
    pub samples: SamplesConfig,

    /// Classification sources; the first one starts active
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

fn default_app_name() -> String {
    "Polymet".to_string()
}

fn default_sources() -> Vec<SourceConfig> {
    vec![SourceConfig {
        id: 1,
        name: DEFAULT_SOURCE_LABEL.to_string(),
        field: MetricField::Temperature2m,
        rules: default_rules(),
    }]
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Canvas section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: f32,
    #[serde(default = "default_canvas_height")]
    pub height: f32,
    /// Spacing of background grid lines
    #[serde(default = "default_grid_cell_size")]
    pub grid_cell_size: f32,
}

fn default_canvas_width() -> f32 {
    canvas::WIDTH
}

fn default_canvas_height() -> f32 {
    canvas::HEIGHT
}

fn default_grid_cell_size() -> f32 {
    canvas::GRID_CELL
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            grid_cell_size: default_grid_cell_size(),
        }
    }
}

/// Timeline section of the config, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_domain_max")]
    pub domain_max: f32,
    #[serde(default = "default_initial_start")]
    pub initial_start: f32,
    #[serde(default = "default_initial_end")]
    pub initial_end: f32,
}

fn default_domain_max() -> f32 {
    timeline::DOMAIN_MAX
}

fn default_initial_start() -> f32 {
    timeline::INITIAL_START
}

fn default_initial_end() -> f32 {
    timeline::INITIAL_END
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            domain_max: default_domain_max(),
            initial_start: default_initial_start(),
            initial_end: default_initial_end(),
        }
    }
}

/// Sample fetching section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplesConfig {
    /// Requests unresolved after this long are filled with synthetic samples
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Seed for the synthetic fallback generator (random when absent)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_timeout_ms() -> u64 {
    samples::TIMEOUT_MS
}

impl Default for SamplesConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            seed: None,
        }
    }
}

impl SamplesConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

/// Classification source configuration for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique identifier for the source
    pub id: SourceId,
    /// Display name of the source
    pub name: String,
    /// Sample attribute to classify
    #[serde(default)]
    pub field: MetricField,
    /// Rules in evaluation order
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
}

impl From<&ClassificationSource> for SourceConfig {
    fn from(source: &ClassificationSource) -> Self {
        Self {
            id: source.id,
            name: source.name.clone(),
            field: source.field,
            rules: source.rules.clone(),
        }
    }
}

impl From<SourceConfig> for ClassificationSource {
    fn from(config: SourceConfig) -> Self {
        ClassificationSource::new(config.id, &config.name, config.field, config.rules)
    }
}

impl DashboardConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            canvas: CanvasConfig::default(),
            timeline: TimelineConfig::default(),
            samples: SamplesConfig::default(),
            sources: default_sources(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.canvas;
        if [c.width, c.height, c.grid_cell_size]
            .iter()
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(ConfigError::InvalidCanvas {
                width: c.width,
                height: c.height,
                grid_cell_size: c.grid_cell_size,
            });
        }

        let t = &self.timeline;
        if let Err(e) =
            polymet_ui::RangeSelector::new(t.domain_max, t.initial_start, t.initial_end)
        {
            return Err(ConfigError::InvalidTimeline(e));
        }

        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if let Some(source) = self.sources.iter().find(|s| s.name.trim().is_empty()) {
            return Err(ConfigError::EmptySourceName(source.id));
        }
        let mut seen = BTreeSet::new();
        if let Some(source) = self.sources.iter().find(|s| !seen.insert(s.id)) {
            return Err(ConfigError::DuplicateSourceId(source.id));
        }
        Ok(())
    }

    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "polymet-config.json"
    }

    /// Get the default config file path for auto-load/save.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("polymet").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("polymet")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Timeline domain or initial range is unusable
    #[error("Invalid timeline: {0}")]
    InvalidTimeline(polymet_ui::RangeError),

    /// Canvas dimensions must be finite and positive
    #[error("Invalid canvas {width}x{height} with grid cell {grid_cell_size}")]
    InvalidCanvas {
        width: f32,
        height: f32,
        grid_cell_size: f32,
    },

    /// A source has a blank name
    #[error("Classification source {0} has an empty name")]
    EmptySourceName(SourceId),

    /// Two sources share an id
    #[error("Classification source id {0} is used more than once")]
    DuplicateSourceId(SourceId),

    /// No classification sources configured
    #[error("At least one classification source is required")]
    NoSources,
}
