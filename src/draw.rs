//! Polygon drawing state machine.
//!
//! ```text
//! Idle --toggle--> Drawing([])
//! Drawing(v) --toggle--> Idle                      (vertices discarded)
//! Drawing(v) --click(p)--> Drawing(v + [p])        while |v| < 11
//! Drawing(v) --click(p)--> Idle, emit v + [p]      when |v| == 11
//! Drawing(v) --double-click--> Idle, emit v        when |v| >= 3
//! ```
//!
//! Finalizing is not a resting state: the transition that emits a polygon
//! lands directly in `Idle`.

use polymet_ui::{Point, MAX_POLYGON_VERTICES, MIN_POLYGON_VERTICES};

/// State for a polygon currently being drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawState {
    /// Not currently drawing.
    #[default]
    Idle,
    /// Drawing a polygon - stores vertices added so far (canvas-local).
    Drawing { vertices: Vec<Point> },
}

impl DrawState {
    /// Check if draw mode is on.
    pub fn is_drawing(&self) -> bool {
        matches!(self, DrawState::Drawing { .. })
    }

    /// Vertices placed so far (empty when idle).
    pub fn vertices(&self) -> &[Point] {
        match self {
            DrawState::Drawing { vertices } => vertices,
            DrawState::Idle => &[],
        }
    }

    /// Toggle draw mode. Entering starts from an empty vertex list; leaving
    /// discards whatever was placed.
    pub fn toggle(&mut self) {
        match self {
            DrawState::Idle => {
                *self = DrawState::Drawing {
                    vertices: Vec::new(),
                };
                log::debug!("Draw mode on");
            }
            DrawState::Drawing { vertices } => {
                log::debug!("Draw mode off, discarding {} vertices", vertices.len());
                *self = DrawState::Idle;
            }
        }
    }

    /// Place a vertex. Returns the finished vertex list when the vertex cap
    /// is reached.
    pub fn click(&mut self, point: Point) -> Option<Vec<Point>> {
        let DrawState::Drawing { vertices } = self else {
            return None;
        };

        vertices.push(point);
        log::debug!(
            "Vertex {} placed at ({:.1}, {:.1})",
            vertices.len(),
            point.x,
            point.y
        );

        if vertices.len() >= MAX_POLYGON_VERTICES {
            return self.finalize();
        }
        None
    }

    /// Finish the polygon if enough vertices have been placed; otherwise
    /// nothing changes.
    pub fn double_click(&mut self) -> Option<Vec<Point>> {
        if self.vertices().len() < MIN_POLYGON_VERTICES {
            if self.is_drawing() {
                log::debug!(
                    "Double-click with {} vertices ignored, need at least {}",
                    self.vertices().len(),
                    MIN_POLYGON_VERTICES
                );
            }
            return None;
        }
        self.finalize()
    }

    fn finalize(&mut self) -> Option<Vec<Point>> {
        match std::mem::take(self) {
            DrawState::Drawing { vertices } => Some(vertices),
            DrawState::Idle => None,
        }
    }
}
