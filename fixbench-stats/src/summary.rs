//! Summary Statistics
//!
//! Mean, spread and standard error are computed from TRIMMED samples;
//! min and max come from ALL samples so the report still shows the extremes.

use crate::outliers::{OutlierFence, trim_outliers};
use crate::percentiles::compute_percentile;
use serde::{Deserialize, Serialize};

/// Summary of one candidate's per-iteration timings (seconds per op)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Number of samples collected (before trimming)
    pub sample_count: usize,
    /// Number of samples dropped by the fence
    pub outlier_count: usize,
    /// Mean of trimmed samples
    pub mean: f64,
    /// Median of trimmed samples
    pub median: f64,
    /// Sample standard deviation of trimmed samples
    pub std_dev: f64,
    /// Standard error of the mean
    pub std_error: f64,
    /// Smallest raw sample
    pub min: f64,
    /// Largest raw sample
    pub max: f64,
    /// Degrees of freedom used for the t critical value
    pub degrees_of_freedom: usize,
}

/// Summarize raw samples
pub fn summarize(samples: &[f64], fence: OutlierFence) -> SampleSummary {
    if samples.is_empty() {
        return SampleSummary::default();
    }

    let trimmed = trim_outliers(samples, fence);
    let kept = &trimmed.kept;
    let n = kept.len();

    let mean = if n == 0 {
        0.0
    } else {
        kept.iter().sum::<f64>() / n as f64
    };

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = kept.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    let std_error = if n == 0 {
        0.0
    } else {
        std_dev / (n as f64).sqrt()
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SampleSummary {
        sample_count: samples.len(),
        outlier_count: trimmed.outlier_count(),
        mean,
        median: compute_percentile(kept, 50.0),
        std_dev,
        std_error,
        min,
        max,
        degrees_of_freedom: n.saturating_sub(1),
    }
}

impl SampleSummary {
    /// Operations per second implied by the mean seconds-per-op
    pub fn ops_per_second(&self) -> f64 {
        if self.mean > 0.0 { 1.0 / self.mean } else { 0.0 }
    }

    /// Coefficient of variation as a percentage
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }
}
