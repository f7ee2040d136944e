//! Boundary to the metric-generation collaborator.
//!
//! The canvas never fetches samples itself. It queues [`SampleRequest`]s that
//! the host hands to a [`SampleSource`] (synchronously or not) and feeds the
//! outcome back as a [`SampleResponse`]. Each request carries the polygon's
//! sample generation so that responses overtaken by a newer request can be
//! recognized and dropped.

use polymet_ui::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use web_time::Instant;

use crate::model::{PolygonId, Sample};

/// Reasons a sample request did not produce usable samples.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    /// The collaborator rejected the request
    #[error("Sample source rejected request: {0}")]
    Rejected(String),

    /// No response arrived within the configured timeout
    #[error("Sample request timed out after {waited_ms} ms")]
    TimedOut { waited_ms: u128 },

    /// The collaborator returned the wrong number of samples
    #[error("Expected {expected} samples, got {found}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Anything that can produce `unit_count` samples for a location.
///
/// Implementations must return exactly `unit_count` samples and must accept
/// `unit_count == 0` (returning an empty list).
pub trait SampleSource {
    fn generate_samples(
        &mut self,
        location: Point,
        unit_count: usize,
    ) -> Result<Vec<Sample>, SampleError>;
}

/// A request for fresh samples for one polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRequest {
    pub polygon_id: PolygonId,
    /// Generation the polygon was at when this request was issued
    pub generation: u64,
    /// Polygon centroid, canvas-local
    pub location: Point,
    pub unit_count: usize,
    pub issued_at: Instant,
}

impl SampleRequest {
    /// Run this request against `source`, producing a response.
    pub fn fulfill(&self, source: &mut dyn SampleSource) -> SampleResponse {
        SampleResponse {
            polygon_id: self.polygon_id,
            generation: self.generation,
            result: source.generate_samples(self.location, self.unit_count),
        }
    }
}

/// Outcome of a [`SampleRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResponse {
    pub polygon_id: PolygonId,
    pub generation: u64,
    pub result: Result<Vec<Sample>, SampleError>,
}

/// Locally synthesized samples: a slow sine around a random base temperature
/// with a little noise. Never fails.
#[derive(Debug, Clone)]
pub struct SyntheticSamples {
    rng: StdRng,
}

impl SyntheticSamples {
    /// Generator with a fixed seed, for reproducible output.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the thread RNG.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::rng().random())
    }

    /// Generate `unit_count` samples.
    pub fn generate(&mut self, unit_count: usize) -> Vec<Sample> {
        let base_temp = 20.0 + self.rng.random::<f32>() * 15.0;
        let base_humidity = 40.0 + self.rng.random::<f32>() * 50.0;
        let base_wind = self.rng.random::<f32>() * 10.0;

        (0..unit_count)
            .map(|i| {
                let phase = (i as f32 * 0.1).sin();
                let temp = base_temp + phase * 5.0 + (self.rng.random::<f32>() - 0.5) * 3.0;
                let humidity = (base_humidity - phase * 10.0
                    + (self.rng.random::<f32>() - 0.5) * 6.0)
                    .clamp(40.0, 90.0);
                let wind = (base_wind + phase.abs() * 3.0 + (self.rng.random::<f32>() - 0.5) * 2.0)
                    .clamp(0.0, 15.0);
                Sample {
                    unit: i as u32,
                    temperature_2m: round1(temp),
                    humidity: Some(round1(humidity)),
                    wind_speed: Some(round1(wind)),
                }
            })
            .collect()
    }
}

impl Default for SyntheticSamples {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl SampleSource for SyntheticSamples {
    fn generate_samples(
        &mut self,
        _location: Point,
        unit_count: usize,
    ) -> Result<Vec<Sample>, SampleError> {
        Ok(self.generate(unit_count))
    }
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_length_matches_request() {
        let mut source = SyntheticSamples::seeded(1);
        assert_eq!(source.generate(24).len(), 24);
        assert!(source.generate(0).is_empty());
        let samples = source.generate_samples(Point::new(0.0, 0.0), 5).unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[4].unit, 4);
    }

    #[test]
    fn test_synthetic_values_are_plausible() {
        let mut source = SyntheticSamples::seeded(42);
        for sample in source.generate(200) {
            // base in [20, 35], sine ±5, noise ±1.5
            assert!((13.0..=42.0).contains(&sample.temperature_2m));
            let humidity = sample.humidity.unwrap();
            assert!((40.0..=90.0).contains(&humidity));
            let wind = sample.wind_speed.unwrap();
            assert!((0.0..=15.0).contains(&wind));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SyntheticSamples::seeded(7).generate(10);
        let b = SyntheticSamples::seeded(7).generate(10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fulfill_carries_request_identity() {
        let request = SampleRequest {
            polygon_id: 3,
            generation: 9,
            location: Point::new(1.0, 2.0),
            unit_count: 4,
            issued_at: Instant::now(),
        };
        let response = request.fulfill(&mut SyntheticSamples::seeded(0));
        assert_eq!(response.polygon_id, 3);
        assert_eq!(response.generation, 9);
        assert_eq!(response.result.unwrap().len(), 4);
    }
}
