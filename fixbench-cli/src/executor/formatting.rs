//! Output Formatting
//!
//! Human-readable output for run reports and suite listings.

use crate::suite::Suite;
use fixbench_report::{Report, render_human};

/// Format a report for terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = render_human(&report.fixtures);
    if !output.is_empty() {
        output.push('\n');
    }

    let summary = &report.summary;
    output.push_str(&format!(
        "{} fixture(s), {} candidate run(s): {} measured, {} failed ({})\n",
        summary.fixtures,
        summary.candidates,
        summary.measured,
        summary.failed,
        format_duration(summary.total_duration_ms)
    ));
    output
}

/// Format milliseconds as `850ms`, `12.40s` or `2m 05s`
pub fn format_duration(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.0}ms", ms)
    } else if ms < 60_000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        let secs = (ms / 1000.0).round() as u64;
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// List the suite's fixtures and code entries
pub fn format_listing(suite: &Suite) -> String {
    let mut output = String::new();
    for (title, registry) in [("fixtures", suite.fixtures()), ("code", suite.code())] {
        output.push_str(&format!("{} ({}):\n", title, registry.len()));
        for entry in registry.list() {
            let alias = entry
                .alias
                .as_deref()
                .map(|a| format!(" [{}]", a))
                .unwrap_or_default();
            let size = entry.size_label();
            output.push_str(&format!(
                " · {}{} {}{}\n",
                entry.key,
                alias,
                entry.meta.relative_slash(),
                if size.is_empty() { String::new() } else { format!(" {}", size) }
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(850.0), "850ms");
        assert_eq!(format_duration(12_400.0), "12.40s");
        assert_eq!(format_duration(125_000.0), "2m 05s");
    }
}
