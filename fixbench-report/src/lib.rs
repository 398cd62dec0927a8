#![warn(missing_docs)]
//! FixBench Report - Ranking and Output
//!
//! Turns per-candidate outcomes into ranked reports and renders them:
//! - `ResultAggregator`: picks the fastest candidates and the relative difference
//! - JSON (machine-readable)
//! - Human-readable terminal text

mod aggregate;
mod json;
mod render;
mod report;

pub use aggregate::{ResultAggregator, aggregate, fastest_of, relative_difference};
pub use json::{SCHEMA_VERSION, generate_json_dry_run, generate_json_report};
pub use render::{format_number, render_dry_run, render_human, render_ranked};
pub use report::{
    CandidateFailure, CandidateOutcome, DryRunRecord, FixtureInfo, RankedReport, Report,
    ReportConfig, ReportMeta, ReportSummary, RunResult, SystemInfo,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// JSON with full schema
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
