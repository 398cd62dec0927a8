//! Result Aggregation
//!
//! Reduces per-candidate outcomes into a [`RankedReport`]: failures are set
//! aside, the fastest results are picked by exact throughput equality and the
//! relative difference compares the fastest against the mean of the rest.

use crate::report::{CandidateFailure, CandidateOutcome, FixtureInfo, RankedReport, RunResult};

/// Collects outcomes for one fixture
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    fixture: FixtureInfo,
    results: Vec<RunResult>,
    failures: Vec<CandidateFailure>,
}

impl ResultAggregator {
    /// Start aggregating for `fixture`
    pub fn new(fixture: FixtureInfo) -> Self {
        Self {
            fixture,
            results: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Record one outcome
    pub fn record(&mut self, outcome: CandidateOutcome) {
        match outcome {
            CandidateOutcome::Completed(result) => self.results.push(result),
            CandidateOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    /// Rank what was recorded
    pub fn finish(self) -> RankedReport {
        let fastest = fastest_of(&self.results);
        let relative_difference_percent = relative_difference(&self.results);
        RankedReport {
            fixture: self.fixture,
            results: self.results,
            fastest,
            relative_difference_percent,
            failures: self.failures,
        }
    }
}

/// Rank `outcomes` for `fixture`
pub fn aggregate(
    fixture: FixtureInfo,
    outcomes: impl IntoIterator<Item = CandidateOutcome>,
) -> RankedReport {
    let mut aggregator = ResultAggregator::new(fixture);
    for outcome in outcomes {
        aggregator.record(outcome);
    }
    aggregator.finish()
}

/// Names of every result sharing the maximum throughput
pub fn fastest_of(results: &[RunResult]) -> Vec<String> {
    let Some(max) = results
        .iter()
        .map(|r| r.ops_per_second)
        .reduce(f64::max)
    else {
        return Vec::new();
    };
    results
        .iter()
        .filter(|r| r.ops_per_second == max)
        .map(|r| r.name.clone())
        .collect()
}

/// `round(F / mean(rest) * 100)` where `F` is the maximum throughput and the
/// rest are the results below it; `None` with fewer than two results, no
/// slower results, or a zero mean.
pub fn relative_difference(results: &[RunResult]) -> Option<u64> {
    if results.len() < 2 {
        return None;
    }
    let top = results
        .iter()
        .map(|r| r.ops_per_second)
        .reduce(f64::max)?;

    let (rest_sum, rest_count) = results
        .iter()
        .filter(|r| r.ops_per_second != top)
        .fold((0.0, 0usize), |(sum, n), r| (sum + r.ops_per_second, n + 1));
    if rest_count == 0 {
        return None;
    }
    let rest_mean = rest_sum / rest_count as f64;
    if rest_mean <= 0.0 {
        return None;
    }
    let percent = (top / rest_mean * 100.0).round();
    percent.is_finite().then_some(percent as u64)
}
