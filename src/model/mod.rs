//! Data models for the Polymet dashboard.

mod polygon;
mod sample;
mod source;

pub use polygon::{Polygon, PolygonId};
pub use sample::{MetricField, Sample};
pub use source::{
    default_rules, ClassificationRule, ClassificationSource, Comparator, Marker, SourceId,
    SourceRegistry,
};
