//! Dashboard message types for Polymet.
//!
//! All input reaching the dashboard is represented as messages in the Elm
//! architecture style; [`crate::Dashboard::update`] is the single mutator.

use polymet_ui::{Handle, PointerEvent};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::model::{MetricField, PolygonId, SourceId};
use crate::samples::SampleResponse;

/// Messages that can be sent to update dashboard state.
#[derive(Debug, Clone)]
pub enum Message {
    // Canvas
    /// Pointer input over the canvas
    Pointer(PointerEvent),
    /// Toggle polygon draw mode
    ToggleDraw,
    /// Reset the pan offset
    ResetView,
    /// Delete a polygon by ID
    DeletePolygon(PolygonId),

    // Classification sources
    /// Make a source active
    SelectSource(SourceId),
    /// Add a source with the default rules
    AddSource { name: String, field: MetricField },

    // Timeline
    /// Range selector interaction
    Timeline(TimelineMessage),

    // Samples
    /// A sample request resolved
    SamplesResolved(SampleResponse),
    /// Time passed; overdue sample requests are expired
    Tick(Instant),
}

/// Range selector interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TimelineMessage {
    /// Pointer pressed on a handle
    DragStart { handle: Handle },
    /// Pointer moved to a fraction of the track
    DragMove { fraction: f32 },
    /// Pointer released; commits the range
    DragEnd,
    /// Drag abandoned; restores the previous range
    DragCancel,
}

/// One step of a replay script, as read from JSON.
///
/// This is the serializable subset of [`Message`]: sample responses and ticks
/// are produced by the replay driver itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    Pointer(PointerEvent),
    ToggleDraw,
    ResetView,
    DeletePolygon {
        id: PolygonId,
    },
    SelectSource {
        id: SourceId,
    },
    AddSource {
        name: String,
        #[serde(default)]
        field: MetricField,
    },
    Timeline(TimelineMessage),
}

impl From<ScriptStep> for Message {
    fn from(step: ScriptStep) -> Self {
        match step {
            ScriptStep::Pointer(event) => Message::Pointer(event),
            ScriptStep::ToggleDraw => Message::ToggleDraw,
            ScriptStep::ResetView => Message::ResetView,
            ScriptStep::DeletePolygon { id } => Message::DeletePolygon(id),
            ScriptStep::SelectSource { id } => Message::SelectSource(id),
            ScriptStep::AddSource { name, field } => Message::AddSource { name, field },
            ScriptStep::Timeline(message) => Message::Timeline(message),
        }
    }
}
