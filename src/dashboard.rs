//! Dashboard state: the annotation canvas, the timeline range selector and
//! the classification sources, wired together.
//!
//! The committed time range sizes every sample request. Ending a handle drag
//! commits a new range and re-requests samples for every polygon.

use polymet_ui::{RangeLabels, RangeSelector, Scene};
use serde::Serialize;
use web_time::Instant;

use crate::canvas::{AnnotationCanvas, PolygonDefaults};
use crate::config::{ConfigError, DashboardConfig};
use crate::constants::{DEFAULT_SOURCE_LABEL, UNDEFINED_METRIC_LABEL};
use crate::message::{Message, TimelineMessage};
use crate::model::{ClassificationSource, Marker, SourceRegistry};
use crate::samples::{SampleSource, SyntheticSamples};

/// Aggregate figures shown alongside the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub polygon_count: usize,
    /// Committed range width, rounded to whole units
    pub range_width: usize,
    /// Active source name, or "None"
    pub active_source: String,
    pub total_samples: usize,
    /// Mean over polygons with a defined metric
    pub mean_metric: Option<f32>,
}

/// One row of the per-polygon summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonSummary {
    /// `P<n>` in creation order
    pub label: String,
    pub source_label: String,
    pub vertex_count: usize,
    /// Metric to one decimal, or "N/A"
    pub metric: String,
}

/// Rule legend for the active classification source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub source: String,
    /// Field name with its unit, e.g. `Temperature (°C)`
    pub field: String,
    /// One entry per rule, in evaluation order
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub marker: Marker,
    pub rule: String,
}

/// Top-level dashboard state.
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    canvas: AnnotationCanvas,
    timeline: RangeSelector,
    sources: SourceRegistry,
}

impl Dashboard {
    /// Build a dashboard from a validated configuration.
    pub fn from_config(config: DashboardConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let t = &config.timeline;
        let timeline = RangeSelector::new(t.domain_max, t.initial_start, t.initial_end)
            .map_err(ConfigError::InvalidTimeline)?;

        let fallback = match config.samples.seed {
            Some(seed) => SyntheticSamples::seeded(seed),
            None => SyntheticSamples::from_entropy(),
        };
        let canvas = AnnotationCanvas::new(config.canvas, fallback);
        let sources = SourceRegistry::from_sources(
            config
                .sources
                .iter()
                .cloned()
                .map(ClassificationSource::from)
                .collect(),
        );

        log::info!(
            "{} ready: {} source(s), range [{}, {}] of {}",
            config.app_name,
            sources.len(),
            t.initial_start,
            t.initial_end,
            t.domain_max
        );

        Ok(Self {
            config,
            canvas,
            timeline,
            sources,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn canvas(&self) -> &AnnotationCanvas {
        &self.canvas
    }

    pub fn timeline(&self) -> &RangeSelector {
        &self.timeline
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn active_source(&self) -> Option<&ClassificationSource> {
        self.sources.active()
    }

    fn polygon_defaults(&self) -> PolygonDefaults {
        PolygonDefaults {
            source_label: self
                .active_source()
                .map(|s| s.name.clone())
                .unwrap_or_else(|| DEFAULT_SOURCE_LABEL.to_string()),
            unit_count: self.timeline.committed().unit_count(),
        }
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Apply one message.
    pub fn update(&mut self, message: Message) {
        match message {
            Message::Pointer(event) => {
                let defaults = self.polygon_defaults();
                self.canvas.handle_pointer(event, &defaults);
            }
            Message::ToggleDraw => self.canvas.toggle_draw(),
            Message::ResetView => self.canvas.reset_view(),
            Message::DeletePolygon(id) => {
                self.canvas.delete_polygon(id);
            }
            Message::SelectSource(id) => {
                self.sources.select(id);
            }
            Message::AddSource { name, field } => {
                self.sources.add(&name, field);
            }
            Message::Timeline(message) => self.update_timeline(message),
            Message::SamplesResolved(response) => {
                self.canvas.apply_samples(response);
            }
            Message::Tick(now) => {
                let expired = self
                    .canvas
                    .expire_requests(now, self.config.samples.timeout());
                if expired > 0 {
                    log::debug!("Expired {} sample request(s)", expired);
                }
            }
        }
    }

    fn update_timeline(&mut self, message: TimelineMessage) {
        match message {
            TimelineMessage::DragStart { handle } => {
                self.timeline.begin_drag(handle);
            }
            TimelineMessage::DragMove { fraction } => {
                self.timeline.update_drag(fraction);
            }
            TimelineMessage::DragEnd => {
                if let Some(committed) = self.timeline.end_drag() {
                    log::debug!(
                        "Range committed: [{:.2}, {:.2}]",
                        committed.start,
                        committed.end
                    );
                    self.canvas.regenerate_samples(committed.unit_count());
                }
            }
            TimelineMessage::DragCancel => {
                self.timeline.cancel_drag();
            }
        }
    }

    /// Resolve every queued sample request synchronously against `source`.
    ///
    /// Returns how many requests were handed out.
    pub fn pump(&mut self, source: &mut dyn SampleSource) -> usize {
        let requests = self.canvas.take_sample_requests();
        let count = requests.len();
        for request in requests {
            let response = request.fulfill(source);
            self.canvas.apply_samples(response);
        }
        count
    }

    /// Expire overdue sample requests as of `now`.
    pub fn tick(&mut self, now: Instant) {
        self.update(Message::Tick(now));
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Render description of the canvas under the active source.
    pub fn scene(&self) -> Scene {
        self.canvas.render(self.active_source())
    }

    pub fn range_labels(&self) -> RangeLabels {
        self.timeline.labels()
    }

    pub fn stats(&self) -> DashboardStats {
        let source = self.active_source();
        let polygons = self.canvas.polygons();

        let metrics: Vec<f32> = match source {
            Some(source) => polygons
                .iter()
                .filter_map(|p| source.metric(p.samples()))
                .collect(),
            None => Vec::new(),
        };

        DashboardStats {
            polygon_count: polygons.len(),
            range_width: self.timeline.committed().unit_count(),
            active_source: source
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "None".to_string()),
            total_samples: polygons.iter().map(|p| p.samples().len()).sum(),
            mean_metric: crate::classify::average_metric(&metrics),
        }
    }

    pub fn polygon_summaries(&self) -> Vec<PolygonSummary> {
        let source = self.active_source();
        self.canvas
            .polygons()
            .iter()
            .enumerate()
            .map(|(index, polygon)| PolygonSummary {
                label: format!("P{}", index + 1),
                source_label: polygon.source_label().to_string(),
                vertex_count: polygon.vertices().len(),
                metric: source
                    .and_then(|s| s.metric(polygon.samples()))
                    .map(|m| format!("{:.1}", m))
                    .unwrap_or_else(|| UNDEFINED_METRIC_LABEL.to_string()),
            })
            .collect()
    }

    pub fn legend(&self) -> Option<Legend> {
        let source = self.active_source()?;
        Some(Legend {
            source: source.name.clone(),
            field: source.field.name().to_string(),
            entries: source
                .rules
                .iter()
                .map(|rule| LegendEntry {
                    marker: rule.marker.clone(),
                    rule: rule.describe(source.field),
                })
                .collect(),
        })
    }
}
