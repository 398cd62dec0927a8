//! Progress Reporting
//!
//! Executors report progress through a `Reporter` passed in by the caller.
//! `ConsoleReporter` draws a spinner per candidate on stderr so stdout stays
//! free for the report itself; `SilentReporter` discards everything.

use crate::planner::ComparisonPlan;
use fixbench_core::{Measurement, NoMatchWarning};
use fixbench_report::{CandidateOutcome, DryRunRecord, RankedReport, format_number};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Receives execution progress
pub trait Reporter {
    /// Fixtures were selected; `total` is the size of the fixture registry
    fn plans_selected(&mut self, _plans: &[ComparisonPlan], _total: usize) {}

    /// The selector matched no fixtures
    fn no_match(&mut self, _warning: &NoMatchWarning) {}

    /// A fixture is about to run
    fn fixture_started(&mut self, _plan: &ComparisonPlan) {}

    /// A candidate is about to be measured
    fn candidate_started(&mut self, _name: &str) {}

    /// Interim figures while a candidate is sampled
    fn cycle(&mut self, _name: &str, _measurement: &Measurement) {}

    /// A candidate finished
    fn candidate_finished(&mut self, _outcome: &CandidateOutcome) {}

    /// A fixture finished
    fn fixture_finished(&mut self, _report: &RankedReport) {}

    /// One dry-run invocation finished
    fn dry_run_record(&mut self, _record: &DryRunRecord) {}
}

/// Discards progress
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Terminal progress on stderr
#[derive(Default)]
pub struct ConsoleReporter {
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    /// New reporter
    pub fn new() -> Self {
        Self::default()
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Reporter for ConsoleReporter {
    fn plans_selected(&mut self, plans: &[ComparisonPlan], total: usize) {
        if plans.is_empty() {
            return;
        }
        eprintln!("Benchmarking: ({} of {})", plans.len(), total);
        for plan in plans {
            eprintln!(" · {}", plan.fixture.key);
        }
        eprintln!();
    }

    fn no_match(&mut self, warning: &NoMatchWarning) {
        eprintln!("No matches for patterns: {}", warning.selector);
    }

    fn fixture_started(&mut self, plan: &ComparisonPlan) {
        let info = plan.fixture_info();
        eprintln!("# {} {}", info.relative, info.size_label());
    }

    fn candidate_started(&mut self, name: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::style());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(name.to_string());
        self.spinner = Some(pb);
    }

    fn cycle(&mut self, name: &str, m: &Measurement) {
        if let Some(pb) = &self.spinner {
            pb.set_message(format!(
                "{} x {} ops/sec ±{:.2}% ({} samples)",
                name,
                format_number(m.ops_per_second),
                m.relative_margin_of_error,
                m.samples
            ));
        }
    }

    fn candidate_finished(&mut self, outcome: &CandidateOutcome) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
        match outcome {
            CandidateOutcome::Completed(r) => eprintln!(
                "  {} x {} ops/sec ±{:.2}% ({} runs sampled)",
                r.name,
                format_number(r.ops_per_second),
                r.relative_margin_of_error,
                r.sample_count
            ),
            CandidateOutcome::Failed(f) => eprintln!("  {} failed: {}", f.name, f.message),
        }
    }

    fn fixture_finished(&mut self, report: &RankedReport) {
        if report.results.len() > 1 {
            eprintln!("  fastest is {}", report.fastest.join(", "));
        }
        eprintln!();
    }

    fn dry_run_record(&mut self, record: &DryRunRecord) {
        eprintln!("{} > {}", record.code, record.fixture);
    }
}
