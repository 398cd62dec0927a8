//! Report Building
//!
//! Wraps the ranked fixtures of one run into a `Report` with metadata and a
//! summary.

use super::metadata::build_report_meta;
use fixbench_core::SamplingConfig;
use fixbench_report::{RankedReport, Report, ReportSummary};
use std::path::Path;

/// Build the run report
pub fn build_report(
    fixtures: Vec<RankedReport>,
    sampling: &SamplingConfig,
    repo_dir: &Path,
    total_duration_ms: f64,
) -> Report {
    let summary = summarize(&fixtures, total_duration_ms);
    Report {
        meta: build_report_meta(repo_dir, sampling),
        fixtures,
        summary,
    }
}

fn summarize(fixtures: &[RankedReport], total_duration_ms: f64) -> ReportSummary {
    let measured: usize = fixtures.iter().map(|f| f.results.len()).sum();
    let failed: usize = fixtures.iter().map(|f| f.failures.len()).sum();
    ReportSummary {
        fixtures: fixtures.len(),
        candidates: measured + failed,
        measured,
        failed,
        total_duration_ms,
    }
}
