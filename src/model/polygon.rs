//! Completed polygon annotations.

use polymet_ui::{centroid, contains_point, is_valid_completed_polygon, GeometryError, Point};
use polymet_ui::{MAX_POLYGON_VERTICES, MIN_POLYGON_VERTICES};
use serde::{Deserialize, Serialize};

use super::sample::Sample;

/// Unique identifier for a polygon.
pub type PolygonId = u32;

/// A finalized polygon with 3 to 12 vertices in canvas-local coordinates.
///
/// Vertices never change after construction. Only the samples are replaced,
/// when the committed time range changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    id: PolygonId,
    vertices: Vec<Point>,
    source_label: String,
    samples: Vec<Sample>,
    /// Generation of the most recent sample request issued for this polygon
    #[serde(skip)]
    sample_generation: u64,
}

impl Polygon {
    /// Create a polygon, validating the vertex count.
    pub fn new(
        id: PolygonId,
        vertices: Vec<Point>,
        source_label: impl Into<String>,
    ) -> Result<Self, GeometryError> {
        if !is_valid_completed_polygon(&vertices) {
            return Err(GeometryError::InvalidGeometry {
                required: format!("{}..={}", MIN_POLYGON_VERTICES, MAX_POLYGON_VERTICES),
                found: vertices.len(),
            });
        }
        Ok(Self {
            id,
            vertices,
            source_label: source_label.into(),
            samples: Vec::new(),
            sample_generation: 0,
        })
    }

    pub fn id(&self) -> PolygonId {
        self.id
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Name of the classification source active when this polygon was created.
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Mean of the vertices, in canvas-local coordinates.
    pub fn centroid(&self) -> Point {
        // Construction guarantees at least three vertices.
        centroid(&self.vertices).unwrap_or_default()
    }

    /// Check if a canvas-local point is inside this polygon.
    pub fn contains(&self, point: Point) -> bool {
        contains_point(&self.vertices, point)
    }

    pub(crate) fn sample_generation(&self) -> u64 {
        self.sample_generation
    }

    /// Bump and return the sample generation for a new request.
    pub(crate) fn next_sample_generation(&mut self) -> u64 {
        self.sample_generation += 1;
        self.sample_generation
    }

    pub(crate) fn replace_samples(&mut self, samples: Vec<Sample>) {
        self.samples = samples;
    }
}
