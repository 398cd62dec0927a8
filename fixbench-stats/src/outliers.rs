//! Outlier Trimming
//!
//! Samples outside `[Q1 - k*IQR, Q3 + k*IQR]` are dropped before the mean and
//! margin of error are computed. Throughput figures are sensitive to the odd
//! scheduler hiccup, so a single slow batch should not drag ops/sec down.

use crate::percentiles::compute_percentile;
use serde::{Deserialize, Serialize};

/// IQR multiplier used to build the fence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierFence {
    /// Tukey fence with multiplier `k` (1.5 is the conventional "inner" fence)
    Iqr(f64),
    /// Keep every sample
    Disabled,
}

impl Default for OutlierFence {
    fn default() -> Self {
        OutlierFence::Iqr(1.5)
    }
}

/// Samples split by the fence
#[derive(Debug, Clone, Default)]
pub struct Trimmed {
    /// Samples inside the fence, in input order
    pub kept: Vec<f64>,
    /// Number of samples below the lower bound
    pub low: usize,
    /// Number of samples above the upper bound
    pub high: usize,
}

impl Trimmed {
    /// Total number of dropped samples
    pub fn outlier_count(&self) -> usize {
        self.low + self.high
    }
}

/// Split samples into kept values and outlier counts
pub fn trim_outliers(samples: &[f64], fence: OutlierFence) -> Trimmed {
    let k = match fence {
        OutlierFence::Iqr(k) if samples.len() >= crate::MIN_TRIM_SAMPLES => k,
        _ => {
            return Trimmed {
                kept: samples.to_vec(),
                low: 0,
                high: 0,
            };
        }
    };

    let q1 = compute_percentile(samples, 25.0);
    let q3 = compute_percentile(samples, 75.0);
    let iqr = q3 - q1;
    let (lower, upper) = (q1 - k * iqr, q3 + k * iqr);

    let mut trimmed = Trimmed {
        kept: Vec::with_capacity(samples.len()),
        low: 0,
        high: 0,
    };
    for &sample in samples {
        if sample < lower {
            trimmed.low += 1;
        } else if sample > upper {
            trimmed.high += 1;
        } else {
            trimmed.kept.push(sample);
        }
    }
    trimmed
}
