//! Human Output
//!
//! Plain-text rendering of ranked reports:
//!
//! ```text
//! # fixtures/short.txt (5 bytes)
//!   a x 1,204,311 ops/sec ±0.52% (50 runs sampled)
//!   b x 481,724 ops/sec ±1.10% (50 runs sampled)
//!
//!   fastest is a (by 250% avg)
//! ```

use crate::report::{DryRunRecord, RankedReport};
use std::fmt::Write;

/// Format a throughput figure: two decimals below 100, none otherwise,
/// with thousands separators.
pub fn format_number(value: f64) -> String {
    let formatted = if value < 100.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.0}", value)
    };
    let (int_part, frac) = match formatted.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut out = String::with_capacity(formatted.len() + digits.len() / 3 + 1);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Render one fixture's results
pub fn render_ranked(report: &RankedReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# {} {}",
        report.fixture.relative,
        report.fixture.size_label()
    );

    for result in &report.results {
        let _ = writeln!(
            out,
            "  {} x {} ops/sec ±{:.2}% ({} runs sampled)",
            result.name,
            format_number(result.ops_per_second),
            result.relative_margin_of_error,
            result.sample_count
        );
    }
    for failure in &report.failures {
        let _ = writeln!(out, "  {} failed: {}", failure.name, failure.message);
    }
    if report.results.is_empty() && report.failures.is_empty() {
        out.push_str("  no candidates\n");
    }

    if !report.fastest.is_empty() {
        let _ = write!(out, "\n  fastest is {}", report.fastest.join(", "));
        if let Some(percent) = report.relative_difference_percent {
            let _ = write!(out, " (by {}% avg)", percent);
        }
        out.push('\n');
    }
    out
}

/// Render every fixture, separated by blank lines
pub fn render_human(reports: &[RankedReport]) -> String {
    reports
        .iter()
        .map(render_ranked)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render dry-run invocations
pub fn render_dry_run(records: &[DryRunRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "{} > {}", record.code, record.fixture);
        match (&record.error, &record.actual) {
            (Some(error), _) => {
                let _ = writeln!(out, "  failed: {}", error);
            }
            (None, Some(actual)) => {
                if let Some(expected) = &record.expected {
                    let _ = writeln!(out, "  expected: {}", expected);
                }
                let _ = write!(out, "  actual:   {}", actual);
                match record.matches {
                    Some(true) => out.push_str("  ✓"),
                    Some(false) => out.push_str("  ✗ mismatch"),
                    None => {}
                }
                out.push('\n');
            }
            (None, None) => out.push_str("  no output\n"),
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CandidateFailure, FixtureInfo, RunResult};
    use serde_json::json;

    fn result(name: &str, ops: f64) -> RunResult {
        RunResult {
            name: name.into(),
            ops_per_second: ops,
            relative_margin_of_error: 0.5,
            sample_count: 50,
        }
    }

    fn ranked() -> RankedReport {
        RankedReport {
            fixture: FixtureInfo {
                key: "short".into(),
                relative: "fixtures/short.txt".into(),
                bytes: 5,
            },
            results: vec![result("a", 1_204_311.2), result("b", 481_724.0)],
            fastest: vec!["a".into()],
            relative_difference_percent: Some(250),
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0.00");
        assert_eq!(format_number(42.5), "42.50");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(1234.2), "1,234");
        assert_eq!(format_number(1_204_311.2), "1,204,311");
        assert_eq!(format_number(999_999.0), "999,999");
    }

    #[test]
    fn test_render_ranked() {
        let text = render_ranked(&ranked());
        assert_eq!(
            text,
            "# fixtures/short.txt (5 bytes)\n\
             \x20 a x 1,204,311 ops/sec ±0.50% (50 runs sampled)\n\
             \x20 b x 481,724 ops/sec ±0.50% (50 runs sampled)\n\
             \n\
             \x20 fastest is a (by 250% avg)\n"
        );
    }

    #[test]
    fn test_render_failures_and_missing_difference() {
        let mut report = ranked();
        report.results.truncate(1);
        report.relative_difference_percent = None;
        report.failures.push(CandidateFailure {
            name: "c".into(),
            message: "aborted: boom".into(),
        });

        let text = render_ranked(&report);
        assert!(text.contains("  c failed: aborted: boom\n"));
        assert!(text.ends_with("  fastest is a\n"));
    }

    #[test]
    fn test_render_empty_plan() {
        let mut report = ranked();
        report.results.clear();
        report.fastest.clear();
        report.relative_difference_percent = None;
        assert_eq!(
            render_ranked(&report),
            "# fixtures/short.txt (5 bytes)\n  no candidates\n"
        );
    }

    #[test]
    fn test_render_dry_run() {
        let records = [
            DryRunRecord {
                code: "a".into(),
                fixture: "short".into(),
                actual: Some(json!("c")),
                expected: Some(json!("c")),
                matches: Some(true),
                error: None,
            },
            DryRunRecord {
                code: "b".into(),
                fixture: "short".into(),
                actual: None,
                expected: None,
                matches: None,
                error: Some("boom".into()),
            },
        ];
        let text = render_dry_run(&records);
        assert!(text.contains("a > short\n  expected: \"c\"\n  actual:   \"c\"  ✓\n"));
        assert!(text.contains("b > short\n  failed: boom\n"));
    }
}
