//! Percentile Computation
//!
//! Linear interpolation between nearest ranks over a sorted copy of the input.

/// Compute a single percentile (0-100) from unsorted samples.
///
/// Returns 0.0 for an empty slice.
///
/// ```ignore
/// # use fixbench_stats::compute_percentile;
/// let q3 = compute_percentile(&[4.0, 1.0, 3.0, 2.0, 5.0], 75.0);
/// assert_eq!(q3, 4.0);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    match samples.len() {
        0 => return 0.0,
        1 => return samples[0],
        _ => {}
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let last = sorted.len() - 1;
    let rank = (percentile.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = rank - lower as f64;

    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd() {
        let p50 = compute_percentile(&[5.0, 1.0, 3.0, 2.0, 4.0], 50.0);
        assert!((p50 - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_median_even_interpolates() {
        let p50 = compute_percentile(&[1.0, 2.0, 3.0, 4.0], 50.0);
        assert!((p50 - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quartiles() {
        let samples: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        assert!((compute_percentile(&samples, 25.0) - 25.75).abs() < 1e-9);
        assert!((compute_percentile(&samples, 75.0) - 75.25).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_percentile_is_clamped() {
        let samples = [1.0, 2.0, 3.0];
        assert_eq!(compute_percentile(&samples, 150.0), 3.0);
        assert_eq!(compute_percentile(&samples, -5.0), 1.0);
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(compute_percentile(&[42.0], 90.0), 42.0);
        assert_eq!(compute_percentile(&[], 50.0), 0.0);
    }
}
