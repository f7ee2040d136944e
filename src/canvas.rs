//! The annotation canvas: completed polygons, the polygon under construction,
//! the pan offset, and the sample requests that keep polygons classified.
//!
//! All pointer input is routed through [`AnnotationCanvas::handle_pointer`],
//! which dispatches to the draw and pan state machines. Draw mode and panning
//! are mutually exclusive: while draw mode is on, a pointer-down never
//! anchors a pan, and clicks that arrive while a pan is active are ignored.

use std::collections::BTreeMap;
use std::time::Duration;

use polymet_ui::{
    to_canvas_local, to_screen, Color, FilledPolygon, Label, PanOffset, PanState, Point,
    PointerEvent, Scene, Stroke,
};
use web_time::Instant;

use crate::config::CanvasConfig;
use crate::constants::style;
use crate::draw::DrawState;
use crate::model::{ClassificationSource, Marker, Polygon, PolygonId, Sample};
use crate::samples::{SampleError, SampleRequest, SampleResponse, SyntheticSamples};

/// Attributes given to a polygon when it is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonDefaults {
    /// Label of the active classification source
    pub source_label: String,
    /// Width of the committed range, in whole units
    pub unit_count: usize,
}

/// Bookkeeping for a request that has been issued but not resolved.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    generation: u64,
    unit_count: usize,
    issued_at: Instant,
}

/// Owns every piece of canvas state; nothing else mutates it.
#[derive(Debug)]
pub struct AnnotationCanvas {
    config: CanvasConfig,
    /// Completed polygons in creation order
    polygons: Vec<Polygon>,
    draw: DrawState,
    pan: PanState,
    offset: PanOffset,
    next_id: PolygonId,
    /// Requests not yet handed to the host
    queued: Vec<SampleRequest>,
    /// Latest unresolved request per polygon
    in_flight: BTreeMap<PolygonId, InFlight>,
    /// Substitute for failed or overdue requests
    fallback: SyntheticSamples,
}

impl AnnotationCanvas {
    pub fn new(config: CanvasConfig, fallback: SyntheticSamples) -> Self {
        Self {
            config,
            polygons: Vec::new(),
            draw: DrawState::default(),
            pan: PanState::default(),
            offset: PanOffset::zero(),
            next_id: 1,
            queued: Vec::new(),
            in_flight: BTreeMap::new(),
            fallback,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Completed polygons in creation order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn polygon(&self, id: PolygonId) -> Option<&Polygon> {
        self.polygons.iter().find(|p| p.id() == id)
    }

    pub fn draw_state(&self) -> &DrawState {
        &self.draw
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.is_drawing()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_panning()
    }

    pub fn pan_offset(&self) -> PanOffset {
        self.offset
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Toggle draw mode, discarding any in-progress vertices when leaving it.
    pub fn toggle_draw(&mut self) {
        self.draw.toggle();
    }

    /// Reset the pan offset to zero. The pan machine state is left alone.
    pub fn reset_view(&mut self) {
        self.offset = PanOffset::zero();
        log::debug!("View reset");
    }

    /// Route one pointer event. Returns the ID of a polygon if this event
    /// completed one.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        defaults: &PolygonDefaults,
    ) -> Option<PolygonId> {
        match event {
            PointerEvent::Down { position } => {
                // In draw mode the press belongs to the click that follows.
                if !self.draw.is_drawing() {
                    self.pan.begin(position, self.offset);
                }
                None
            }
            PointerEvent::Move { position } => {
                if let Some(offset) = self.pan.offset_at(position) {
                    self.offset = offset;
                }
                None
            }
            PointerEvent::Up { .. } => {
                self.pan.end();
                None
            }
            PointerEvent::Click { position } => {
                if self.pan.is_panning() {
                    log::debug!("Click ignored while panning");
                    return None;
                }
                let local = to_canvas_local(position, self.offset);
                let vertices = self.draw.click(local)?;
                self.finalize(vertices, defaults)
            }
            PointerEvent::DoubleClick { .. } => {
                if self.pan.is_panning() {
                    log::debug!("Double-click ignored while panning");
                    return None;
                }
                let vertices = self.draw.double_click()?;
                self.finalize(vertices, defaults)
            }
        }
    }

    fn finalize(&mut self, vertices: Vec<Point>, defaults: &PolygonDefaults) -> Option<PolygonId> {
        let id = self.next_id;
        let polygon = match Polygon::new(id, vertices, defaults.source_label.clone()) {
            Ok(polygon) => polygon,
            Err(e) => {
                log::error!("Discarding polygon from draw state: {}", e);
                return None;
            }
        };
        self.next_id += 1;

        log::info!(
            "Created polygon {} with {} vertices ({})",
            id,
            polygon.vertices().len(),
            polygon.source_label()
        );
        self.polygons.push(polygon);
        self.request_samples(id, defaults.unit_count);
        Some(id)
    }

    /// Remove a polygon and forget its outstanding requests.
    pub fn delete_polygon(&mut self, id: PolygonId) -> bool {
        let before = self.polygons.len();
        self.polygons.retain(|p| p.id() != id);
        if self.polygons.len() == before {
            log::warn!("Cannot delete unknown polygon {}", id);
            return false;
        }
        self.in_flight.remove(&id);
        self.queued.retain(|r| r.polygon_id != id);
        log::info!("Deleted polygon {}", id);
        true
    }

    /// Topmost polygon under a screen-space point.
    pub fn polygon_at(&self, screen: Point) -> Option<PolygonId> {
        let local = to_canvas_local(screen, self.offset);
        self.polygons
            .iter()
            .rev()
            .find(|p| p.contains(local))
            .map(|p| p.id())
    }

    // ========================================================================
    // Sample requests
    // ========================================================================

    /// Request fresh samples of `unit_count` units for every polygon.
    pub fn regenerate_samples(&mut self, unit_count: usize) {
        let ids: Vec<PolygonId> = self.polygons.iter().map(|p| p.id()).collect();
        log::debug!(
            "Regenerating {} samples for {} polygons",
            unit_count,
            ids.len()
        );
        for id in ids {
            self.request_samples(id, unit_count);
        }
    }

    fn request_samples(&mut self, id: PolygonId, unit_count: usize) {
        let Some(polygon) = self.polygons.iter_mut().find(|p| p.id() == id) else {
            return;
        };
        let generation = polygon.next_sample_generation();
        let issued_at = Instant::now();
        let request = SampleRequest {
            polygon_id: id,
            generation,
            location: polygon.centroid(),
            unit_count,
            issued_at,
        };

        // A newer request supersedes one that was never handed out.
        self.queued.retain(|r| r.polygon_id != id);
        self.queued.push(request);
        self.in_flight.insert(
            id,
            InFlight {
                generation,
                unit_count,
                issued_at,
            },
        );
        log::debug!(
            "Sample request for polygon {} (generation {}, {} units)",
            id,
            generation,
            unit_count
        );
    }

    /// Hand all queued requests to the caller.
    pub fn take_sample_requests(&mut self) -> Vec<SampleRequest> {
        std::mem::take(&mut self.queued)
    }

    /// Whether any request is still unresolved.
    pub fn has_pending_samples(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Apply a response. Stale responses are dropped; failures are replaced
    /// by synthetic samples. Returns whether the polygon's samples changed.
    pub fn apply_samples(&mut self, response: SampleResponse) -> bool {
        let current = self.in_flight.get(&response.polygon_id).copied();
        let Some(in_flight) = current.filter(|f| f.generation == response.generation) else {
            log::warn!(
                "Discarding stale samples for polygon {} (generation {})",
                response.polygon_id,
                response.generation
            );
            return false;
        };

        let samples = match response.result {
            Ok(samples) if samples.len() == in_flight.unit_count => samples,
            Ok(samples) => {
                let err = SampleError::LengthMismatch {
                    expected: in_flight.unit_count,
                    found: samples.len(),
                };
                self.synthesize(response.polygon_id, &err, in_flight.unit_count)
            }
            Err(err) => self.synthesize(response.polygon_id, &err, in_flight.unit_count),
        };

        self.in_flight.remove(&response.polygon_id);
        match self
            .polygons
            .iter_mut()
            .find(|p| p.id() == response.polygon_id)
        {
            Some(polygon) if polygon.sample_generation() == in_flight.generation => {
                polygon.replace_samples(samples);
                true
            }
            _ => false,
        }
    }

    /// Resolve requests older than `timeout` with synthetic samples, in
    /// polygon id order.
    ///
    /// Real responses arriving later for these requests are treated as stale.
    pub fn expire_requests(&mut self, now: Instant, timeout: Duration) -> usize {
        let overdue: Vec<(PolygonId, InFlight)> = self
            .in_flight
            .iter()
            .filter(|(_, f)| now.duration_since(f.issued_at) >= timeout)
            .map(|(id, f)| (*id, *f))
            .collect();

        for (id, in_flight) in &overdue {
            let err = SampleError::TimedOut {
                waited_ms: now.duration_since(in_flight.issued_at).as_millis(),
            };
            let samples = self.synthesize(*id, &err, in_flight.unit_count);
            self.in_flight.remove(id);
            self.queued.retain(|r| r.polygon_id != *id);
            if let Some(polygon) = self.polygons.iter_mut().find(|p| p.id() == *id) {
                polygon.replace_samples(samples);
            }
        }
        overdue.len()
    }

    fn synthesize(&mut self, id: PolygonId, err: &SampleError, unit_count: usize) -> Vec<Sample> {
        log::warn!(
            "Sample fetch failed for polygon {}: {}; using synthetic samples",
            id,
            err
        );
        self.fallback.generate(unit_count)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Marker for a polygon under `source` (neutral without a source).
    pub fn marker_for(polygon: &Polygon, source: Option<&ClassificationSource>) -> Marker {
        source
            .map(|s| s.marker_for(polygon.samples()))
            .unwrap_or_else(Marker::neutral)
    }

    /// Build the render description for the current state.
    ///
    /// Classification is re-evaluated on every call.
    pub fn render(&self, source: Option<&ClassificationSource>) -> Scene {
        let mut scene = Scene::new(
            self.config.width,
            self.config.height,
            style_color(style::BACKGROUND),
        );
        let cell = self.config.grid_cell_size;
        scene.push_grid(cell, self.offset.grid_phase(cell), style_color(style::GRID));

        let outline = style_color(style::OUTLINE);
        for (index, polygon) in self.polygons.iter().enumerate() {
            let fill = Self::marker_for(polygon, source)
                .color()
                .with_alpha(style::FILL_ALPHA);
            scene.polygons.push(FilledPolygon {
                vertices: polygon
                    .vertices()
                    .iter()
                    .map(|v| to_screen(*v, self.offset))
                    .collect(),
                fill,
                outline,
                outline_width: style::LINE_WIDTH,
                label: Some(Label {
                    text: format!("P{}", index + 1),
                    position: to_screen(polygon.centroid(), self.offset),
                    color: outline,
                    size: style::LABEL_SIZE,
                }),
            });
        }

        let in_progress = self.draw.vertices();
        if !in_progress.is_empty() {
            scene.preview = Some(Stroke {
                points: in_progress
                    .iter()
                    .map(|v| to_screen(*v, self.offset))
                    .collect(),
                color: style_color(style::PREVIEW),
                width: style::LINE_WIDTH,
                dot_radius: style::VERTEX_DOT_RADIUS,
            });
        }

        scene
    }
}

fn style_color(hex: &str) -> Color {
    Color::from_hex(hex).unwrap_or(Color::BLACK)
}
