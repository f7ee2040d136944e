//! Global constants for the Polymet dashboard.
//!
//! Canvas styling values are kept as hex strings so they read the same as
//! the rule markers they sit next to.

/// Canvas geometry defaults.
pub mod canvas {
    /// Default canvas width in pixels
    pub const WIDTH: f32 = 800.0;
    /// Default canvas height in pixels
    pub const HEIGHT: f32 = 600.0;
    /// Default grid cell size in pixels
    pub const GRID_CELL: f32 = 50.0;
}

/// Timeline (range selector) defaults, in hours.
pub mod timeline {
    /// Domain maximum: 30 days of hourly samples
    pub const DOMAIN_MAX: f32 = 720.0;
    /// Initial lower handle
    pub const INITIAL_START: f32 = 0.0;
    /// Initial upper handle
    pub const INITIAL_END: f32 = 24.0;
}

/// Sample request defaults.
pub mod samples {
    /// In-flight requests older than this are treated as timed out
    pub const TIMEOUT_MS: u64 = 10_000;
}

/// Visual styling of the canvas scene.
pub mod style {
    /// Canvas background
    pub const BACKGROUND: &str = "#f1f5f9";
    /// Grid lines
    pub const GRID: &str = "#e2e8f0";
    /// Marker used when no rule matches or the metric is undefined
    pub const NEUTRAL_MARKER: &str = "#94a3b8";
    /// Completed polygon outline and label
    pub const OUTLINE: &str = "#1e40af";
    /// In-progress stroke and vertex dots
    pub const PREVIEW: &str = "#ef4444";
    /// Fill opacity of completed polygons
    pub const FILL_ALPHA: f32 = 0.7;
    /// Outline / stroke width
    pub const LINE_WIDTH: f32 = 2.0;
    /// Radius of in-progress vertex dots
    pub const VERTEX_DOT_RADIUS: f32 = 4.0;
    /// Polygon label font size
    pub const LABEL_SIZE: f32 = 12.0;
}

/// Source label attached to polygons created while no source is active.
pub const DEFAULT_SOURCE_LABEL: &str = "Open-Meteo";

/// Fallback text for an undefined metric.
pub const UNDEFINED_METRIC_LABEL: &str = "N/A";
