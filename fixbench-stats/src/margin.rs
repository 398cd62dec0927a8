//! Relative Margin of Error
//!
//! `rme = t(df) * standard_error / mean * 100`, with two-tailed 95% Student's t
//! critical values for small samples and the normal approximation beyond 30
//! degrees of freedom.

use crate::summary::SampleSummary;

/// Confidence level the critical values correspond to
pub const CONFIDENCE_LEVEL: f64 = 0.95;

const T_TABLE: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.16,
    2.145, 2.131, 2.12, 2.11, 2.101, 2.093, 2.086, 2.08, 2.074, 2.069, 2.064, 2.06, 2.056, 2.052,
    2.048, 2.045, 2.042,
];

const Z_CRITICAL: f64 = 1.96;

/// Two-tailed 95% critical value for `df` degrees of freedom
pub fn critical_value(df: usize) -> f64 {
    match df {
        0 => T_TABLE[0],
        1..=30 => T_TABLE[df - 1],
        _ => Z_CRITICAL,
    }
}

/// Relative margin of error (percent) for a summary
///
/// Zero when there is no spread or no mean to compare against.
pub fn relative_margin_of_error(summary: &SampleSummary) -> f64 {
    if summary.mean <= 0.0 || summary.std_error == 0.0 {
        return 0.0;
    }
    let moe = summary.std_error * critical_value(summary.degrees_of_freedom);
    (moe / summary.mean) * 100.0
}
