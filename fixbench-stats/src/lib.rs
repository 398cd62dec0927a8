#![warn(missing_docs)]
//! FixBench Statistics
//!
//! Reduces raw per-iteration timings into the figures the sampling engine
//! reports for a candidate:
//! - Outlier trimming via the IQR fence
//! - Summary statistics (mean, spread, standard error)
//! - Relative margin of error using Student's t critical values

mod margin;
mod outliers;
mod percentiles;
mod summary;

pub use margin::{CONFIDENCE_LEVEL, critical_value, relative_margin_of_error};
pub use outliers::{OutlierFence, Trimmed, trim_outliers};
pub use percentiles::compute_percentile;
pub use summary::{SampleSummary, summarize};

/// Samples below this count are reported without outlier trimming
pub const MIN_TRIM_SAMPLES: usize = 8;
