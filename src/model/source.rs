//! Classification sources and their threshold rules.

use std::collections::BTreeMap;

use polymet_ui::Color;
use serde::{Deserialize, Serialize};

use super::sample::{MetricField, Sample};
use crate::classify;
use crate::constants::style;

/// Unique identifier for a classification source.
pub type SourceId = u32;

/// Numeric comparison applied between a metric and a rule threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// Exact float equality. Fragile for averaged metrics.
    #[serde(rename = "=")]
    Equal,
}

impl Comparator {
    /// Whether `metric <op> threshold` holds.
    pub fn matches(&self, metric: f32, threshold: f32) -> bool {
        match self {
            Comparator::Less => metric < threshold,
            Comparator::Greater => metric > threshold,
            Comparator::LessOrEqual => metric <= threshold,
            Comparator::GreaterOrEqual => metric >= threshold,
            Comparator::Equal => metric == threshold,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Less => "<",
            Comparator::Greater => ">",
            Comparator::LessOrEqual => "≤",
            Comparator::GreaterOrEqual => "≥",
            Comparator::Equal => "=",
        }
    }
}

/// Semantic output of classification: a color identifier such as `#3b82f6`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marker(pub String);

impl Marker {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The marker used when nothing matches.
    pub fn neutral() -> Self {
        Self(style::NEUTRAL_MARKER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Paintable color for this marker; unparsable markers paint as neutral.
    pub fn color(&self) -> Color {
        Color::from_hex(&self.0).unwrap_or_else(|| {
            log::warn!("Marker '{}' is not a hex color, painting as neutral", self.0);
            neutral_color()
        })
    }
}

fn neutral_color() -> Color {
    Color::from_hex(style::NEUTRAL_MARKER).unwrap_or(Color::rgb8(0x94, 0xa3, 0xb8))
}

/// A threshold rule: the marker applies when `metric <operator> threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub operator: Comparator,
    pub threshold: f32,
    #[serde(rename = "color")]
    pub marker: Marker,
}

impl ClassificationRule {
    pub fn new(operator: Comparator, threshold: f32, marker: impl Into<String>) -> Self {
        Self {
            operator,
            threshold,
            marker: Marker::new(marker),
        }
    }

    /// Whether this rule is satisfied by `metric`.
    pub fn matches(&self, metric: f32) -> bool {
        self.operator.matches(metric, self.threshold)
    }

    /// Legend text such as `≥ 10°C`.
    pub fn describe(&self, field: MetricField) -> String {
        format!("{} {}{}", self.operator.symbol(), self.threshold, field.unit())
    }
}

/// The rule set given to newly added sources.
///
/// First-match semantics mean the third rule is shadowed by the second.
pub fn default_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::new(Comparator::Less, 10.0, "#3b82f6"),
        ClassificationRule::new(Comparator::GreaterOrEqual, 10.0, "#f59e0b"),
        ClassificationRule::new(Comparator::GreaterOrEqual, 25.0, "#ef4444"),
    ]
}

/// A named rule set applied to one sample attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSource {
    /// Unique identifier
    pub id: SourceId,
    /// Display name, also attached to polygons created under this source
    pub name: String,
    /// Sample attribute to average
    #[serde(default)]
    pub field: MetricField,
    /// Rules in evaluation order
    pub rules: Vec<ClassificationRule>,
}

impl ClassificationSource {
    pub fn new(id: SourceId, name: &str, field: MetricField, rules: Vec<ClassificationRule>) -> Self {
        Self {
            id,
            name: name.to_string(),
            field,
            rules,
        }
    }

    /// Create a source with the default rule set.
    pub fn with_default_rules(id: SourceId, name: &str, field: MetricField) -> Self {
        Self::new(id, name, field, default_rules())
    }

    /// Average of this source's field over `samples`; `None` if undefined.
    pub fn metric(&self, samples: &[Sample]) -> Option<f32> {
        classify::average_metric(&self.field.values(samples))
    }

    /// Marker for `samples`, falling back to neutral when the metric is undefined.
    pub fn marker_for(&self, samples: &[Sample]) -> Marker {
        match self.metric(samples) {
            Some(metric) => classify::classify(metric, &self.rules),
            None => Marker::neutral(),
        }
    }
}

/// Mapping from id to source, plus the single active reference.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: BTreeMap<SourceId, ClassificationSource>,
    active: Option<SourceId>,
    next_id: SourceId,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: BTreeMap::new(),
            active: None,
            next_id: 1,
        }
    }

    /// Build a registry from a list, activating the first source.
    pub fn from_sources(sources: Vec<ClassificationSource>) -> Self {
        let mut registry = Self::new();
        for source in sources {
            registry.insert(source);
        }
        registry
    }

    /// Insert (or replace) a source. The first source inserted becomes active.
    pub fn insert(&mut self, source: ClassificationSource) {
        self.next_id = self.next_id.max(source.id.saturating_add(1));
        if self.active.is_none() {
            self.active = Some(source.id);
        }
        self.sources.insert(source.id, source);
    }

    /// Add a new source with the default rule set and return its ID.
    ///
    /// Returns `None` if the name is blank.
    pub fn add(&mut self, name: &str, field: MetricField) -> Option<SourceId> {
        let name = name.trim();
        if name.is_empty() {
            log::warn!("Ignoring classification source with empty name");
            return None;
        }
        let id = self.next_id;
        self.insert(ClassificationSource::with_default_rules(id, name, field));
        log::info!("Added classification source '{}' ({:?})", name, field);
        Some(id)
    }

    /// Make `id` the active source. Returns `false` for unknown IDs.
    pub fn select(&mut self, id: SourceId) -> bool {
        if !self.sources.contains_key(&id) {
            log::warn!("Cannot select unknown classification source {}", id);
            return false;
        }
        if self.active != Some(id) {
            self.active = Some(id);
            log::info!("Selected classification source {}", id);
        }
        true
    }

    /// The active source, if any.
    pub fn active(&self) -> Option<&ClassificationSource> {
        self.active.and_then(|id| self.sources.get(&id))
    }

    pub fn active_id(&self) -> Option<SourceId> {
        self.active
    }

    pub fn get(&self, id: SourceId) -> Option<&ClassificationSource> {
        self.sources.get(&id)
    }

    /// All sources in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassificationSource> {
        self.sources.values()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temps(values: &[f32]) -> Vec<Sample> {
        values
            .iter()
            .enumerate()
            .map(|(i, t)| Sample::temperature(i as u32, *t))
            .collect()
    }

    #[test]
    fn test_comparators() {
        assert!(Comparator::Less.matches(9.9, 10.0));
        assert!(!Comparator::Less.matches(10.0, 10.0));
        assert!(Comparator::LessOrEqual.matches(10.0, 10.0));
        assert!(Comparator::Greater.matches(10.1, 10.0));
        assert!(Comparator::GreaterOrEqual.matches(10.0, 10.0));
        assert!(Comparator::Equal.matches(10.0, 10.0));
        assert!(!Comparator::Equal.matches(10.000001, 10.0));
    }

    #[test]
    fn test_rule_serde_uses_operator_symbols() {
        let json = r##"{"operator": ">=", "threshold": 25.0, "color": "#ef4444"}"##;
        let rule: ClassificationRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.operator, Comparator::GreaterOrEqual);
        assert_eq!(rule.marker, Marker::new("#ef4444"));

        let back = serde_json::to_string(&rule).unwrap();
        assert!(back.contains("\">=\""));
        assert!(back.contains("\"color\""));
    }

    #[test]
    fn test_source_marker_for_samples() {
        let source = ClassificationSource::with_default_rules(1, "Open-Meteo", MetricField::Temperature2m);
        assert_eq!(source.marker_for(&temps(&[4.0, 6.0])), Marker::new("#3b82f6"));
        assert_eq!(source.marker_for(&temps(&[12.0, 14.0])), Marker::new("#f59e0b"));
        // Shadowed by the >= 10 rule
        assert_eq!(source.marker_for(&temps(&[30.0])), Marker::new("#f59e0b"));
        assert_eq!(source.marker_for(&[]), Marker::neutral());
    }

    #[test]
    fn test_source_metric_uses_field() {
        let source = ClassificationSource::with_default_rules(1, "Wind", MetricField::WindSpeed);
        // Temperature-only samples carry no wind speed
        assert_eq!(source.metric(&temps(&[20.0])), None);
    }

    #[test]
    fn test_marker_color_fallback() {
        assert_eq!(Marker::new("#ffffff").color(), Color::WHITE);
        assert_eq!(Marker::new("blue").color(), Marker::neutral().color());
    }

    #[test]
    fn test_registry_first_source_is_active() {
        let registry = SourceRegistry::from_sources(vec![
            ClassificationSource::with_default_rules(1, "A", MetricField::Temperature2m),
            ClassificationSource::with_default_rules(2, "B", MetricField::Humidity),
        ]);
        assert_eq!(registry.active_id(), Some(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_add_and_select() {
        let mut registry = SourceRegistry::from_sources(vec![ClassificationSource::with_default_rules(
            5,
            "A",
            MetricField::Temperature2m,
        )]);
        let id = registry.add("  Humidity  ", MetricField::Humidity).unwrap();
        assert_eq!(id, 6);
        assert_eq!(registry.get(id).unwrap().name, "Humidity");
        assert_eq!(registry.get(id).unwrap().rules.len(), 3);

        assert!(registry.select(id));
        assert_eq!(registry.active().unwrap().id, id);
        assert!(!registry.select(99));
        assert_eq!(registry.active_id(), Some(id));
    }

    #[test]
    fn test_registry_rejects_blank_name() {
        let mut registry = SourceRegistry::new();
        assert_eq!(registry.add("   ", MetricField::Temperature2m), None);
        assert!(registry.is_empty());
        assert!(registry.active().is_none());
    }

    #[test]
    fn test_default_registry_starts_ids_at_one() {
        let mut registry = SourceRegistry::default();
        assert_eq!(registry.add("A", MetricField::Temperature2m), Some(1));
        assert_eq!(registry.add("B", MetricField::Humidity), Some(2));
        assert_eq!(registry.active_id(), Some(1));
    }

    #[test]
    fn test_rule_describe() {
        let rules = default_rules();
        assert_eq!(rules[0].describe(MetricField::Temperature2m), "< 10°C");
        assert_eq!(rules[2].describe(MetricField::Temperature2m), "≥ 25°C");
        let rule = ClassificationRule::new(Comparator::LessOrEqual, 2.5, "#000000");
        assert_eq!(rule.describe(MetricField::WindSpeed), "≤ 2.5 m/s");
    }
}
