//! Plan Execution
//!
//! Runs comparison plans one fixture at a time, one candidate at a time.
//!
//! ## Execution Modes
//!
//! - **Timed (`Executor`)**: each candidate is handed to a `TimingEngine`;
//!   outcomes are ranked by `ResultAggregator`.
//!
//! - **Dry run (`DryRunExecutor`)**: each candidate is invoked once per
//!   fixture and its output recorded, optionally checked against the
//!   expected value carried by the fixture.
//!
//! ## Data Flow
//!
//! ```text
//! ComparisonPlan (fixture + candidates)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │  TimingEngine    │  Warmup → Sampling → Measurement
//! └────────┬─────────┘
//!          │
//!          ▼
//!  CandidateOutcome (result or failure)
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ ResultAggregator │  fastest + relative difference
//! └────────┬─────────┘
//!          │
//!          ▼
//!    RankedReport
//! ```
//!
//! Cancellation is checked between fixtures only; the fixture in flight
//! always completes.

use super::reporter::Reporter;
use crate::planner::ComparisonPlan;
use fixbench_core::{EngineError, FileEntry, InvokeError, InvokeInput, TimingEngine};
use fixbench_report::{
    CandidateFailure, CandidateOutcome, DryRunRecord, RankedReport, ResultAggregator, RunResult,
};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// A candidate did not produce a measurement
#[derive(Debug, Error)]
#[error("candidate '{candidate}' failed on fixture '{fixture}': {source}")]
pub struct CandidateExecutionError {
    /// Candidate key
    pub candidate: String,
    /// Fixture key
    pub fixture: String,
    /// Engine error
    #[source]
    pub source: EngineError,
}

impl From<&CandidateExecutionError> for CandidateFailure {
    fn from(err: &CandidateExecutionError) -> Self {
        CandidateFailure {
            name: err.candidate.clone(),
            message: err.source.to_string(),
        }
    }
}

/// Runs plans against a timing engine
pub struct Executor<E: TimingEngine> {
    engine: E,
    cancel: Arc<AtomicBool>,
}

impl<E: TimingEngine> Executor<E> {
    /// Executor measuring with `engine`
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an existing cancellation flag
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Flag that stops execution before the next fixture when set
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// The engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Execute all plans in order
    pub fn execute(
        &mut self,
        plans: &[ComparisonPlan],
        reporter: &mut dyn Reporter,
    ) -> Vec<RankedReport> {
        let mut reports = Vec::with_capacity(plans.len());
        for (i, plan) in plans.iter().enumerate() {
            if self.cancel.load(Ordering::Relaxed) {
                tracing::info!("Cancelled; skipping {} remaining fixture(s)", plans.len() - i);
                break;
            }
            reports.push(self.execute_plan(plan, reporter));
        }
        reports
    }

    /// Execute one plan
    pub fn execute_plan(
        &mut self,
        plan: &ComparisonPlan,
        reporter: &mut dyn Reporter,
    ) -> RankedReport {
        reporter.fixture_started(plan);
        let mut aggregator = ResultAggregator::new(plan.fixture_info());

        for candidate in &plan.candidates {
            reporter.candidate_started(&candidate.key);
            let outcome = match self.measure(&plan.fixture, candidate, reporter) {
                Ok(result) => CandidateOutcome::Completed(result),
                Err(err) => {
                    tracing::warn!("{}", err);
                    CandidateOutcome::Failed(CandidateFailure::from(&err))
                }
            };
            reporter.candidate_finished(&outcome);
            aggregator.record(outcome);
        }

        let report = aggregator.finish();
        reporter.fixture_finished(&report);
        report
    }

    fn measure(
        &mut self,
        fixture: &FileEntry,
        candidate: &FileEntry,
        reporter: &mut dyn Reporter,
    ) -> Result<RunResult, CandidateExecutionError> {
        let fail = |source: EngineError| CandidateExecutionError {
            candidate: candidate.key.clone(),
            fixture: fixture.key.clone(),
            source,
        };

        let (Some(data), Some(callable)) = (fixture.fixture(), candidate.candidate()) else {
            return Err(fail(EngineError::Aborted(InvokeError::Failed(
                "entry has no loaded payload".to_string(),
            ))));
        };

        let args = data.args();
        let input = InvokeInput {
            fixture_path: fixture.path(),
            fixture: data,
            args: &args,
        };
        let name = candidate.key.as_str();

        let measurement = self
            .engine
            .measure(
                name,
                &mut || {
                    let out = callable.invoke(&input)?;
                    std::hint::black_box(out);
                    Ok(())
                },
                &mut |m| reporter.cycle(name, m),
            )
            .map_err(fail)?;

        Ok(RunResult::from_measurement(name, &measurement))
    }
}

/// Invokes every candidate once per fixture, without timing
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor {
    verify: bool,
}

impl DryRunExecutor {
    /// Dry run; with `verify`, JSON-array fixtures carry the expected value last
    pub fn new(verify: bool) -> Self {
        Self { verify }
    }

    /// Invoke all plans in order
    pub fn execute(
        &self,
        plans: &[ComparisonPlan],
        reporter: &mut dyn Reporter,
    ) -> Vec<DryRunRecord> {
        let mut records = Vec::new();
        for plan in plans {
            for candidate in &plan.candidates {
                let record = self.invoke_once(&plan.fixture, candidate);
                reporter.dry_run_record(&record);
                records.push(record);
            }
        }
        records
    }

    fn invoke_once(&self, fixture: &FileEntry, candidate: &FileEntry) -> DryRunRecord {
        let mut record = DryRunRecord {
            code: candidate.key.clone(),
            fixture: fixture.key.clone(),
            actual: None,
            expected: None,
            matches: None,
            error: None,
        };

        let (Some(data), Some(callable)) = (fixture.fixture(), candidate.candidate()) else {
            record.error = Some("entry has no loaded payload".to_string());
            return record;
        };

        let (args, expected): (Vec<Value>, Option<Value>) =
            match data.split_expected().filter(|_| self.verify) {
                Some((args, expected)) => (args, Some(expected)),
                None => (data.args(), None),
            };

        let input = InvokeInput {
            fixture_path: fixture.path(),
            fixture: data,
            args: &args,
        };
        match callable.invoke(&input) {
            Ok(actual) => {
                record.matches = expected.as_ref().map(|e| *e == actual);
                if record.matches == Some(false) {
                    tracing::warn!(
                        "{} > {}: expected {}, got {}",
                        record.code,
                        record.fixture,
                        expected.as_ref().map_or_else(String::new, serde_json::Value::to_string),
                        actual
                    );
                }
                record.actual = Some(actual);
            }
            Err(e) => record.error = Some(e.to_string()),
        }
        record.expected = expected;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::reporter::SilentReporter;
    use crate::planner::build_plans;
    use fixbench_core::{FileRegistry, FnResolver, Measurement};
    use serde_json::json;

    /// Engine reporting a fixed throughput per candidate name
    struct FixedEngine {
        calls: usize,
    }

    impl TimingEngine for FixedEngine {
        fn measure(
            &mut self,
            name: &str,
            routine: &mut dyn FnMut() -> Result<(), InvokeError>,
            on_cycle: &mut dyn FnMut(&Measurement),
        ) -> Result<Measurement, EngineError> {
            self.calls += 1;
            routine()?;
            let ops = match name {
                "fast" => 100.0,
                "mid" => 50.0,
                _ => 30.0,
            };
            let m = Measurement {
                samples: 5,
                ops_per_second: ops,
                relative_margin_of_error: 1.0,
            };
            on_cycle(&m);
            Ok(m)
        }
    }

    fn suite(files: &[(&str, &str)]) -> (tempfile::TempDir, FileRegistry, FileRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let mut fixtures = FileRegistry::fixtures(dir.path());
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
            fixtures.add(name).unwrap();
        }
        let resolver = FnResolver::new()
            .register_fn("fast", |args| json!(args.len()))
            .register_fn("mid", |args| args.last().cloned().unwrap_or(json!(null)))
            .register_fn("slow", |_| json!("slow"))
            .register(
                "broken",
                fixbench_core::candidate_fn(|_| Err(InvokeError::Failed("boom".into()))),
            );
        let code = FileRegistry::code(dir.path(), Arc::new(resolver));
        (dir, fixtures, code)
    }

    #[test]
    fn test_execute_ranks_each_fixture() {
        let (_dir, fixtures, mut code) = suite(&[("short.txt", "abc"), ("long.txt", "abcdef")]);
        for name in ["slow.js", "fast.js", "mid.js"] {
            code.add(name).unwrap();
        }
        let plans = build_plans(fixtures.list().iter().cloned(), &code);

        let mut executor = Executor::new(FixedEngine { calls: 0 });
        let reports = executor.execute(&plans, &mut SilentReporter);

        assert_eq!(reports.len(), 2);
        assert_eq!(executor.engine().calls, 6);
        let first = &reports[0];
        assert_eq!(first.fixture.key, "short");
        assert_eq!(first.fastest, ["fast"]);
        assert_eq!(first.relative_difference_percent, Some(250));
    }

    #[test]
    fn test_failures_reduce_result_count() {
        let (_dir, fixtures, mut code) = suite(&[("short.txt", "abc")]);
        for name in ["fast.js", "broken.js", "slow.js"] {
            code.add(name).unwrap();
        }
        let plans = build_plans(fixtures.list().iter().cloned(), &code);

        let mut executor = Executor::new(FixedEngine { calls: 0 });
        let report = executor.execute_plan(&plans[0], &mut SilentReporter);

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "broken");
        assert_eq!(report.failures[0].message, "aborted: boom");
    }

    #[test]
    fn test_empty_plan_is_a_noop() {
        let (_dir, fixtures, code) = suite(&[("short.txt", "abc")]);
        let plans = build_plans(fixtures.list().iter().cloned(), &code);
        let mut executor = Executor::new(FixedEngine { calls: 0 });
        let reports = executor.execute(&plans, &mut SilentReporter);

        assert_eq!(executor.engine().calls, 0);
        assert!(reports[0].results.is_empty());
        assert_eq!(reports[0].relative_difference_percent, None);
    }

    #[test]
    fn test_cancel_stops_before_next_fixture() {
        let (_dir, fixtures, mut code) = suite(&[("a.txt", "a"), ("b.txt", "b")]);
        code.add("fast.js").unwrap();
        let plans = build_plans(fixtures.list().iter().cloned(), &code);

        let mut executor = Executor::new(FixedEngine { calls: 0 });
        executor.cancel_flag().store(true, Ordering::Relaxed);
        assert!(executor.execute(&plans, &mut SilentReporter).is_empty());

        let shared = Arc::new(AtomicBool::new(false));
        let mut executor =
            Executor::new(FixedEngine { calls: 0 }).with_cancel_flag(Arc::clone(&shared));
        assert_eq!(executor.execute(&plans, &mut SilentReporter).len(), 2);
        shared.store(true, Ordering::Relaxed);
        assert!(executor.cancel_flag().load(Ordering::Relaxed));
        assert!(executor.execute(&plans, &mut SilentReporter).is_empty());
    }

    #[test]
    fn test_dry_run_verifies_expected_value() {
        let (_dir, fixtures, mut code) = suite(&[("case.json", r#"["x", "y", "y"]"#)]);
        code.add("mid.js").unwrap();
        code.add("fast.js").unwrap();
        code.add("broken.js").unwrap();
        let plans = build_plans(fixtures.list().iter().cloned(), &code);

        let records = DryRunExecutor::new(true).execute(&plans, &mut SilentReporter);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].actual, Some(json!("y")));
        assert_eq!(records[0].matches, Some(true));
        // verification strips the expected value from the arguments
        assert_eq!(records[1].actual, Some(json!(2)));
        assert_eq!(records[1].matches, Some(false));
        assert_eq!(records[2].error.as_deref(), Some("boom"));

        let unverified = DryRunExecutor::new(false).execute(&plans, &mut SilentReporter);
        assert_eq!(unverified[1].actual, Some(json!(3)));
        assert_eq!(unverified[1].matches, None);
    }
}
