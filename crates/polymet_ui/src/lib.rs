//! polymet_ui - Interaction primitives for a pannable 2D canvas
//!
//! This crate provides the pointer-driven building blocks used by the
//! polygon dashboard: canvas geometry, drag-to-pan state, a two-handle range
//! selector and a render-ready scene description. Nothing here knows about
//! annotations or classification.

mod event;
mod geometry;
mod pan;
mod range_selector;
mod render;

pub use event::PointerEvent;
pub use geometry::{
    centroid, contains_point, is_valid_completed_polygon, to_canvas_local, to_screen,
    GeometryError, PanOffset, Point, MAX_POLYGON_VERTICES, MIN_POLYGON_VERTICES,
};
pub use pan::PanState;
pub use range_selector::{
    format_clock, CommittedRange, Handle, RangeError, RangeLabels, RangeSelector, RangeTrack,
    MIN_RANGE_WIDTH,
};
pub use render::{Color, FilledPolygon, Label, Line, Scene, Stroke};
