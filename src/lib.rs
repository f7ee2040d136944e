//! Polymet - Polygon Metric Dashboard
//!
//! Draw polygons on a pannable canvas, classify each one by a metric averaged
//! over its samples, and scrub the time window those samples cover.

pub mod canvas;
pub mod classify;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod draw;
pub mod message;
pub mod model;
pub mod samples;

pub use canvas::{AnnotationCanvas, PolygonDefaults};
pub use config::{ConfigError, DashboardConfig, LogLevel};
pub use dashboard::{Dashboard, DashboardStats, Legend, LegendEntry, PolygonSummary};
pub use message::{Message, ScriptStep, TimelineMessage};
pub use samples::{SampleError, SampleRequest, SampleResponse, SampleSource, SyntheticSamples};
