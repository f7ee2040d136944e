//! Threshold classification of scalar metrics.
//!
//! Both functions are pure. Markers are never cached per polygon: callers
//! re-run classification whenever rules, the active source, or samples change.

use crate::model::{ClassificationRule, Marker};

/// Arithmetic mean of `samples`, or `None` when there is nothing to average.
pub fn average_metric(samples: &[f32]) -> Option<f32> {
    if samples.is_empty() {
        return None;
    }
    let sum: f32 = samples.iter().sum();
    Some(sum / samples.len() as f32)
}

/// Marker of the first rule satisfied by `metric`, or the neutral marker.
///
/// Rules are scanned in order; later rules that would also match are never
/// consulted.
pub fn classify(metric: f32, rules: &[ClassificationRule]) -> Marker {
    rules
        .iter()
        .find(|rule| rule.matches(metric))
        .map(|rule| rule.marker.clone())
        .unwrap_or_else(Marker::neutral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Comparator;

    fn rule(op: Comparator, threshold: f32, marker: &str) -> ClassificationRule {
        ClassificationRule::new(op, threshold, marker)
    }

    #[test]
    fn test_average_metric() {
        assert_eq!(average_metric(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(average_metric(&[-5.0]), Some(-5.0));
        assert_eq!(average_metric(&[]), None);
    }

    #[test]
    fn test_first_match_wins() {
        let rules = vec![
            rule(Comparator::Less, 10.0, "A"),
            rule(Comparator::GreaterOrEqual, 10.0, "B"),
        ];
        assert_eq!(classify(10.0, &rules), Marker::new("B"));
        assert_eq!(classify(5.0, &rules), Marker::new("A"));
    }

    #[test]
    fn test_reordered_non_overlapping_rules() {
        let rules = vec![
            rule(Comparator::GreaterOrEqual, 10.0, "B"),
            rule(Comparator::Less, 10.0, "A"),
        ];
        assert_eq!(classify(5.0, &rules), Marker::new("A"));
        assert_eq!(classify(10.0, &rules), Marker::new("B"));
    }

    #[test]
    fn test_overlapping_rules_are_order_sensitive() {
        let broad_first = vec![
            rule(Comparator::GreaterOrEqual, 10.0, "warm"),
            rule(Comparator::GreaterOrEqual, 25.0, "hot"),
        ];
        let narrow_first = vec![
            rule(Comparator::GreaterOrEqual, 25.0, "hot"),
            rule(Comparator::GreaterOrEqual, 10.0, "warm"),
        ];
        assert_eq!(classify(30.0, &broad_first), Marker::new("warm"));
        assert_eq!(classify(30.0, &narrow_first), Marker::new("hot"));
    }

    #[test]
    fn test_no_match_returns_neutral() {
        let rules = vec![rule(Comparator::Greater, 100.0, "A")];
        assert_eq!(classify(1.0, &rules), Marker::neutral());
        assert_eq!(classify(1.0, &[]), Marker::neutral());
    }

    #[test]
    fn test_equal_is_exact() {
        let rules = vec![rule(Comparator::Equal, 0.3, "exact")];
        assert_eq!(classify(0.3, &rules), Marker::new("exact"));
        assert_eq!(classify(0.30001, &rules), Marker::neutral());
    }
}
