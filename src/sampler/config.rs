use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::attention::CoordinateSpace;

/// Configuration for the sampling loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Readings per second (5 Hz keeps per-tick file rewrites cheap; 30 Hz for finer timelines)
    pub sample_rate_hz: f64,

    /// Coordinate space gaze is recorded in
    pub coordinates: CoordinateSpace,

    /// Print a line per sample to stdout
    pub echo: bool,
}

impl SamplerConfig {
    /// Time between ticks
    pub fn period(&self) -> Result<Duration> {
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            bail!(
                "Sample rate must be a positive number of Hz, got {}",
                self.sample_rate_hz
            );
        }

        Ok(Duration::from_secs_f64(1.0 / self.sample_rate_hz))
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 5.0,
            coordinates: CoordinateSpace::Pixel,
            echo: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_rate() {
        let config = SamplerConfig {
            sample_rate_hz: 5.0,
            ..Default::default()
        };
        let period = config.period().unwrap();
        assert!((period.as_secs_f64() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_rates_rejected() {
        for rate in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = SamplerConfig {
                sample_rate_hz: rate,
                ..Default::default()
            };
            assert!(config.period().is_err(), "rate {} should be rejected", rate);
        }
    }
}
