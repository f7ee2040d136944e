//! Time-series samples attached to polygons.

use serde::{Deserialize, Serialize};

/// One sample per time unit (hour) of the committed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Index of the time unit within the requested range
    pub unit: u32,
    /// Air temperature at 2 m, in °C
    pub temperature_2m: f32,
    /// Relative humidity, in %
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f32>,
    /// Wind speed, in m/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f32>,
}

impl Sample {
    /// A temperature-only sample.
    pub fn temperature(unit: u32, temperature_2m: f32) -> Self {
        Self {
            unit,
            temperature_2m,
            humidity: None,
            wind_speed: None,
        }
    }
}

/// Which sample attribute a classification source averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    #[default]
    #[serde(rename = "temperature_2m")]
    Temperature2m,
    Humidity,
    WindSpeed,
}

impl MetricField {
    /// Get the display name for this field.
    pub fn name(&self) -> &'static str {
        match self {
            MetricField::Temperature2m => "Temperature (°C)",
            MetricField::Humidity => "Humidity (%)",
            MetricField::WindSpeed => "Wind Speed (m/s)",
        }
    }

    /// Unit suffix used when formatting metric values.
    pub fn unit(&self) -> &'static str {
        match self {
            MetricField::Temperature2m => "°C",
            MetricField::Humidity => "%",
            MetricField::WindSpeed => " m/s",
        }
    }

    /// Read this field from a sample, if present.
    pub fn value_of(&self, sample: &Sample) -> Option<f32> {
        match self {
            MetricField::Temperature2m => Some(sample.temperature_2m),
            MetricField::Humidity => sample.humidity,
            MetricField::WindSpeed => sample.wind_speed,
        }
    }

    /// Extract this field from every sample that carries it.
    pub fn values(&self, samples: &[Sample]) -> Vec<f32> {
        samples.iter().filter_map(|s| self.value_of(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_skip_missing() {
        let samples = vec![
            Sample {
                unit: 0,
                temperature_2m: 20.0,
                humidity: Some(50.0),
                wind_speed: None,
            },
            Sample::temperature(1, 22.0),
        ];
        assert_eq!(MetricField::Temperature2m.values(&samples), vec![20.0, 22.0]);
        assert_eq!(MetricField::Humidity.values(&samples), vec![50.0]);
        assert!(MetricField::WindSpeed.values(&samples).is_empty());
    }

    #[test]
    fn test_field_serde_names() {
        let json = serde_json::to_string(&MetricField::Temperature2m).unwrap();
        assert_eq!(json, "\"temperature_2m\"");
        let field: MetricField = serde_json::from_str("\"wind_speed\"").unwrap();
        assert_eq!(field, MetricField::WindSpeed);
    }
}
