//! Canvas geometry: points, pan offsets, and the pure functions built on them.
//!
//! Everything here is side-effect free. Completed polygons store their
//! vertices in canvas-local coordinates (before the pan offset is applied),
//! so the only transform between the pointer and the stored shape is a
//! translation by the current [`PanOffset`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of vertices for a completed polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Maximum number of vertices for a completed polygon.
pub const MAX_POLYGON_VERTICES: usize = 12;

/// A 2D point. Depending on context this is either a screen-space position
/// (as delivered with pointer events) or a canvas-local position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Translation applied to canvas content when it is painted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanOffset {
    pub dx: f32,
    pub dy: f32,
}

impl PanOffset {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// The zero offset, used on explicit view reset.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Offset shifted by the movement from `from` to `to`.
    pub fn shifted(&self, from: Point, to: Point) -> Self {
        Self {
            dx: self.dx + (to.x - from.x),
            dy: self.dy + (to.y - from.y),
        }
    }

    /// Grid phase for a grid with the given cell size, always in `[0, cell)`.
    pub fn grid_phase(&self, cell: f32) -> (f32, f32) {
        (self.dx.rem_euclid(cell), self.dy.rem_euclid(cell))
    }
}

/// Errors raised by geometry functions when their preconditions are broken.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Fewer (or more) vertices than the operation requires.
    #[error("Invalid geometry: expected {required} vertices, found {found}")]
    InvalidGeometry {
        /// Human-readable requirement, e.g. "at least 1" or "3..=12"
        required: String,
        /// Number of vertices actually supplied
        found: usize,
    },
}

/// Convert a screen-space point to canvas-local coordinates.
pub fn to_canvas_local(screen: Point, pan: PanOffset) -> Point {
    Point::new(screen.x - pan.dx, screen.y - pan.dy)
}

/// Convert a canvas-local point back to screen space.
///
/// This is the inverse of [`to_canvas_local`]. The round trip is exact
/// whenever the coordinates and offset are representable without rounding,
/// which holds for pixel-grid input.
pub fn to_screen(local: Point, pan: PanOffset) -> Point {
    Point::new(local.x + pan.dx, local.y + pan.dy)
}

/// Arithmetic mean of the vertices.
pub fn centroid(vertices: &[Point]) -> Result<Point, GeometryError> {
    if vertices.is_empty() {
        return Err(GeometryError::InvalidGeometry {
            required: "at least 1".to_string(),
            found: 0,
        });
    }

    let n = vertices.len() as f32;
    let (sum_x, sum_y) = vertices
        .iter()
        .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    Ok(Point::new(sum_x / n, sum_y / n))
}

/// Whether a vertex list may form a completed polygon.
pub fn is_valid_completed_polygon(vertices: &[Point]) -> bool {
    (MIN_POLYGON_VERTICES..=MAX_POLYGON_VERTICES).contains(&vertices.len())
}

/// Point-in-polygon test using ray casting.
pub fn contains_point(vertices: &[Point], point: Point) -> bool {
    if vertices.len() < MIN_POLYGON_VERTICES {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];
        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_to_canvas_local_subtracts_offset() {
        let local = to_canvas_local(Point::new(120.0, 80.0), PanOffset::new(20.0, -30.0));
        assert_eq!(local, Point::new(100.0, 110.0));
    }

    #[test]
    fn test_round_trip_recovers_screen_point() {
        let offsets = [
            PanOffset::zero(),
            PanOffset::new(12.5, -7.25),
            PanOffset::new(-4096.0, 2048.0),
            PanOffset::new(0.5, 333.0),
        ];
        let points = [
            Point::new(0.0, 0.0),
            Point::new(799.0, 599.0),
            Point::new(-15.5, 42.75),
        ];

        for pan in offsets {
            for p in points {
                assert_eq!(to_screen(to_canvas_local(p, pan), pan), p);
            }
        }
    }

    #[test]
    fn test_centroid_is_mean() {
        let c = centroid(&[
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(50.0, 50.0),
        ])
        .unwrap();
        assert!(approx_eq(c.x, 110.0 / 3.0));
        assert!(approx_eq(c.y, 70.0 / 3.0));
    }

    #[test]
    fn test_centroid_of_empty_fails() {
        let err = centroid(&[]).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidGeometry { found: 0, .. }));
    }

    #[test]
    fn test_completed_polygon_bounds() {
        let p = Point::new(1.0, 1.0);
        assert!(!is_valid_completed_polygon(&[p, p]));
        assert!(is_valid_completed_polygon(&[p, p, p]));
        assert!(is_valid_completed_polygon(&[p; 12]));
        assert!(!is_valid_completed_polygon(&[p; 13]));
    }

    #[test]
    fn test_contains_point() {
        let poly = square();
        assert!(contains_point(&poly, Point::new(50.0, 50.0)));
        assert!(!contains_point(&poly, Point::new(150.0, 50.0)));
        assert!(!contains_point(&poly[..2], Point::new(50.0, 0.0)));
    }

    #[test]
    fn test_grid_phase_is_non_negative() {
        let (gx, gy) = PanOffset::new(-20.0, 130.0).grid_phase(50.0);
        assert!(approx_eq(gx, 30.0));
        assert!(approx_eq(gy, 30.0));
    }

    #[test]
    fn test_shifted_offset() {
        let pan = PanOffset::new(5.0, 5.0).shifted(Point::new(10.0, 10.0), Point::new(25.0, 0.0));
        assert_eq!(pan, PanOffset::new(20.0, -5.0));
    }
}
