//! Device-independent pointer events.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A pointer event carrying a screen-space position relative to the surface
/// that received it.
///
/// Events are expected in increasing timestamp order; up/down pairs are never
/// coalesced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Primary button pressed
    Down { position: Point },
    /// Pointer moved (button state irrelevant)
    Move { position: Point },
    /// Primary button released
    Up { position: Point },
    /// Press and release without a drag
    Click { position: Point },
    /// Second click in quick succession
    DoubleClick { position: Point },
}

impl PointerEvent {
    /// Screen-space position of this event.
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position }
            | PointerEvent::Click { position }
            | PointerEvent::DoubleClick { position } => position,
        }
    }

    /// Short name used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            PointerEvent::Down { .. } => "down",
            PointerEvent::Move { .. } => "move",
            PointerEvent::Up { .. } => "up",
            PointerEvent::Click { .. } => "click",
            PointerEvent::DoubleClick { .. } => "double-click",
        }
    }
}
