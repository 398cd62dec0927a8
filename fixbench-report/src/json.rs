//! JSON Output

use crate::report::{DryRunRecord, Report};

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Generate a prettified JSON report
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Generate prettified JSON for dry-run records
pub fn generate_json_dry_run(records: &[DryRunRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::report::{
        CandidateOutcome, FixtureInfo, ReportConfig, ReportMeta, ReportSummary, RunResult,
        SystemInfo,
    };

    #[test]
    fn test_report_serializes_ranked_fixtures() {
        let ranked = aggregate(
            FixtureInfo {
                key: "short".into(),
                relative: "fixtures/short.txt".into(),
                bytes: 5,
            },
            [CandidateOutcome::Completed(RunResult {
                name: "a".into(),
                ops_per_second: 10.0,
                relative_margin_of_error: 1.0,
                sample_count: 3,
            })],
        );
        let report = Report {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: "0.1.0".into(),
                timestamp: chrono::Utc::now(),
                git_commit: None,
                git_branch: None,
                system: SystemInfo {
                    os: "linux".into(),
                    os_version: "6".into(),
                    cpu: "test".into(),
                    cpu_cores: 1,
                    memory_gb: 1.0,
                },
                config: ReportConfig {
                    warmup_time_ns: 0,
                    measurement_time_ns: 0,
                    target_samples: 5,
                    min_iterations: None,
                    max_iterations: None,
                    confidence_level: 0.95,
                },
            },
            fixtures: vec![ranked],
            summary: ReportSummary::default(),
        };

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["fixtures"][0]["fixture"]["key"], "short");
        assert_eq!(value["fixtures"][0]["fastest"][0], "a");
        assert!(value["fixtures"][0]["relative_difference_percent"].is_null());
        assert_eq!(value["meta"]["schema_version"], 1);
    }
}
