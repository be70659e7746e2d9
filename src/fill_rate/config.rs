//! Sampling configuration.

use crate::error::{FillRateError, Result};
use serde::{Deserialize, Serialize};

/// Configuration governing whether and how blankness samples are aggregated.
///
/// `sample_rate` weights the once-per-sampler participation decision;
/// `min_sample_count` suppresses reports from under-sampled sessions.
///
/// Sampling is opt-in: the default rate is `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Fraction of samplers that participate, in `[0.0, 1.0]`.
    pub sample_rate: f64,
    /// Minimum accumulated samples required for a flush to emit a report.
    pub min_sample_count: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 0.0,
            min_sample_count: 10,
        }
    }
}

impl SamplerConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FillRateError::InvalidSampleRate`] if `sample_rate` is NaN
    /// or outside `[0.0, 1.0]`.
    pub fn new(sample_rate: f64, min_sample_count: u32) -> Result<Self> {
        let config = Self {
            sample_rate,
            min_sample_count,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FillRateError::InvalidSampleRate`] if `sample_rate` is NaN
    /// or outside `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.sample_rate) {
            return Err(FillRateError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }
}
