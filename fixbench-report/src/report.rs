//! Report Data Structures

use chrono::{DateTime, Utc};
use fixbench_core::{FileEntry, Measurement};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub fixtures: Vec<RankedReport>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub git_commit: Option<String>,
    pub git_branch: Option<String>,
    pub system: SystemInfo,
    pub config: ReportConfig,
}

/// Engine settings captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub warmup_time_ns: u64,
    pub measurement_time_ns: u64,
    pub target_samples: usize,
    pub min_iterations: Option<u64>,
    pub max_iterations: Option<u64>,
    pub confidence_level: f64,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    pub cpu: String,
    pub cpu_cores: u32,
    pub memory_gb: f64,
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Fixtures that were run
    pub fixtures: usize,
    /// Candidate runs attempted across all fixtures
    pub candidates: usize,
    /// Candidate runs that produced a result
    pub measured: usize,
    /// Candidate runs that failed
    pub failed: usize,
    pub total_duration_ms: f64,
}

/// The fixture a ranked report belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureInfo {
    /// Entry key
    pub key: String,
    /// Path relative to the fixture registry cwd
    pub relative: String,
    /// Size in bytes
    pub bytes: usize,
}

impl FixtureInfo {
    /// Size descriptor, e.g. `(42 bytes)`
    pub fn size_label(&self) -> String {
        format!("({} bytes)", self.bytes)
    }
}

impl From<&FileEntry> for FixtureInfo {
    fn from(entry: &FileEntry) -> Self {
        Self {
            key: entry.key.clone(),
            relative: entry.meta.relative_slash(),
            bytes: entry.fixture().map_or(0, |f| f.size),
        }
    }
}

/// One candidate's measurement against a fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Candidate key
    pub name: String,
    /// Throughput
    pub ops_per_second: f64,
    /// Relative margin of error, percent
    pub relative_margin_of_error: f64,
    /// Samples the engine collected
    pub sample_count: usize,
}

impl RunResult {
    /// Result for `name` from an engine measurement
    pub fn from_measurement(name: impl Into<String>, m: &Measurement) -> Self {
        Self {
            name: name.into(),
            ops_per_second: m.ops_per_second,
            relative_margin_of_error: m.relative_margin_of_error,
            sample_count: m.samples,
        }
    }
}

/// A candidate whose measurement did not complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFailure {
    /// Candidate key
    pub name: String,
    /// Error message
    pub message: String,
}

/// What happened when one candidate ran
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    /// Measured
    Completed(RunResult),
    /// Errored, aborted or panicked
    Failed(CandidateFailure),
}

/// Ranked results for one fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedReport {
    pub fixture: FixtureInfo,
    /// Results in plan order
    pub results: Vec<RunResult>,
    /// Names of the fastest results, in plan order
    pub fastest: Vec<String>,
    /// Fastest throughput as a percentage of the mean of the rest
    pub relative_difference_percent: Option<u64>,
    pub failures: Vec<CandidateFailure>,
}

impl RankedReport {
    /// True if `name` is among the fastest
    pub fn is_fastest(&self, name: &str) -> bool {
        self.fastest.iter().any(|f| f == name)
    }
}

/// One dry-run invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryRunRecord {
    /// Candidate key
    pub code: String,
    /// Fixture key
    pub fixture: String,
    /// Candidate output, absent when the invocation failed
    pub actual: Option<Value>,
    /// Expected value, when verifying
    pub expected: Option<Value>,
    /// Whether `actual` equals `expected`, when verifying
    pub matches: Option<bool>,
    /// Invocation error
    pub error: Option<String>,
}
