//! Drag-to-pan interaction state.

use crate::geometry::{PanOffset, Point};

/// Pan drag interaction state for the canvas.
///
/// Panning is anchored: the offset during a drag is always computed from the
/// pointer-down position and the offset at that moment, so intermediate
/// moves never accumulate rounding drift.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    /// Not dragging
    #[default]
    Stationary,
    /// Dragging, anchored at the pointer-down position (screen space)
    Panning {
        anchor_screen: Point,
        anchor_offset: PanOffset,
    },
}

impl PanState {
    /// Check if currently panning
    pub fn is_panning(&self) -> bool {
        matches!(self, PanState::Panning { .. })
    }

    /// Begin a pan at `screen`, capturing `offset` as the anchor.
    ///
    /// Returns `false` (and changes nothing) if a pan is already active.
    pub fn begin(&mut self, screen: Point, offset: PanOffset) -> bool {
        if self.is_panning() {
            return false;
        }
        *self = PanState::Panning {
            anchor_screen: screen,
            anchor_offset: offset,
        };
        log::debug!("Pan drag started at ({:.1}, {:.1})", screen.x, screen.y);
        true
    }

    /// Offset for the pointer now at `screen`, or `None` when not panning.
    ///
    /// The offset is unbounded; content may be panned arbitrarily far.
    pub fn offset_at(&self, screen: Point) -> Option<PanOffset> {
        match self {
            PanState::Panning {
                anchor_screen,
                anchor_offset,
            } => Some(anchor_offset.shifted(*anchor_screen, screen)),
            PanState::Stationary => None,
        }
    }

    /// Stop panning
    pub fn end(&mut self) {
        if self.is_panning() {
            log::debug!("Pan drag ended");
        }
        *self = PanState::Stationary;
    }
}
