//! Suite Session
//!
//! A `Suite` owns the fixture and code registries of one benchmark session
//! together with the sampling settings used to measure them. Patterns are
//! added to either side, a selector picks fixtures, and every selected
//! fixture is bound to a fresh comparison plan.

use crate::executor::{DryRunExecutor, Executor, Reporter};
use crate::planner::{ComparisonPlan, build_plans};
use fixbench_core::{
    CodeResolver, FileRegistry, InvalidPatternError, InvalidSelectorError, NoMatchWarning,
    Pattern, PatternResolver, RenameRule, Resolution, SamplingConfig, SamplingEngine, Selector,
    TimingEngine, filter,
};
use fixbench_report::{DryRunRecord, RankedReport};
use std::path::Path;
use std::sync::Arc;

/// Plans chosen by a selector
#[derive(Debug, Default)]
pub struct Selection {
    /// One plan per matched fixture, in registry order
    pub plans: Vec<ComparisonPlan>,
    /// Set when the selector matched nothing
    pub warning: Option<NoMatchWarning>,
}

/// Fixture and code registries of one benchmark session
#[derive(Debug)]
pub struct Suite {
    fixtures: FileRegistry,
    code: FileRegistry,
    resolver: PatternResolver,
    sampling: SamplingConfig,
}

impl Suite {
    /// Empty suite rooted at `cwd`, keyed by file stem
    pub fn new(cwd: impl AsRef<Path>, code_resolver: Arc<dyn CodeResolver>) -> Self {
        Self::with_rename_rule(cwd, code_resolver, RenameRule::default())
    }

    /// Empty suite whose entries are keyed by `rule`
    pub fn with_rename_rule(
        cwd: impl AsRef<Path>,
        code_resolver: Arc<dyn CodeResolver>,
        rule: RenameRule,
    ) -> Self {
        let cwd = cwd.as_ref();
        Self {
            fixtures: FileRegistry::fixtures(cwd).with_rename(rule.clone()),
            code: FileRegistry::code(cwd, code_resolver).with_rename(rule),
            resolver: PatternResolver::new(),
            sampling: SamplingConfig::default(),
        }
    }

    /// Measure with `sampling` in [`Suite::run`]
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Resolve `pattern` into the fixture registry
    pub fn add_fixtures(
        &mut self,
        pattern: impl Into<Pattern>,
    ) -> Result<Resolution, InvalidPatternError> {
        self.resolver.resolve(&mut self.fixtures, &pattern.into())
    }

    /// Resolve `pattern` into the code registry
    pub fn add_code(
        &mut self,
        pattern: impl Into<Pattern>,
    ) -> Result<Resolution, InvalidPatternError> {
        self.resolver.resolve(&mut self.code, &pattern.into())
    }

    /// Fixture registry
    pub fn fixtures(&self) -> &FileRegistry {
        &self.fixtures
    }

    /// Code registry
    pub fn code(&self) -> &FileRegistry {
        &self.code
    }

    /// Sampling settings
    pub fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    /// Select fixtures and plan each against the current code registry
    pub fn select(&self, selector: &Selector) -> Result<Selection, InvalidSelectorError> {
        let matched = filter(&self.fixtures, selector)?;
        let warning = if matched.is_empty() {
            let warning = NoMatchWarning {
                selector: selector.clone(),
                category: self.fixtures.category(),
                total: self.fixtures.len(),
            };
            tracing::warn!("{}", warning);
            Some(warning)
        } else {
            None
        };

        Ok(Selection {
            plans: build_plans(matched, &self.code),
            warning,
        })
    }

    /// Select, then tell `reporter` what was picked or that nothing matched
    fn select_reported(
        &self,
        selector: &Selector,
        reporter: &mut dyn Reporter,
    ) -> Result<Selection, InvalidSelectorError> {
        let selection = self.select(selector)?;
        if let Some(warning) = &selection.warning {
            reporter.no_match(warning);
        }
        reporter.plans_selected(&selection.plans, self.fixtures.len());
        Ok(selection)
    }

    /// Select and measure with the suite's sampling engine
    pub fn run(
        &self,
        selector: &Selector,
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<RankedReport>, InvalidSelectorError> {
        self.run_with(SamplingEngine::new(self.sampling), selector, reporter)
    }

    /// Select and measure with `engine`
    pub fn run_with<E: TimingEngine>(
        &self,
        engine: E,
        selector: &Selector,
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<RankedReport>, InvalidSelectorError> {
        let selection = self.select_reported(selector, reporter)?;
        Ok(Executor::new(engine).execute(&selection.plans, reporter))
    }

    /// Select and invoke every candidate once per fixture
    pub fn dry_run(
        &self,
        selector: &Selector,
        verify: bool,
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<DryRunRecord>, InvalidSelectorError> {
        let selection = self.select_reported(selector, reporter)?;
        Ok(DryRunExecutor::new(verify).execute(&selection.plans, reporter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SilentReporter;
    use fixbench_core::FnResolver;
    use serde_json::json;

    fn suite() -> (tempfile::TempDir, Suite) {
        let dir = tempfile::tempdir().unwrap();
        for dir_name in ["fixtures", "code"] {
            std::fs::create_dir(dir.path().join(dir_name)).unwrap();
        }
        std::fs::write(dir.path().join("fixtures/short.txt"), "abc").unwrap();
        std::fs::write(dir.path().join("fixtures/long.txt"), "abcdefghij").unwrap();
        std::fs::write(dir.path().join("code/upper.js"), "").unwrap();

        let resolver = FnResolver::new().register_fn("upper", |args| {
            json!(args.first().and_then(|v| v.as_str()).map(str::to_uppercase))
        });
        let suite = Suite::new(dir.path(), Arc::new(resolver));
        (dir, suite)
    }

    #[test]
    fn test_select_binds_plans() {
        let (_dir, mut suite) = suite();
        suite.add_fixtures("fixtures/*").unwrap();
        suite.add_code("code/*.js").unwrap();

        let selection = suite.select(&Selector::from("fixtures/short.txt")).unwrap();
        assert!(selection.warning.is_none());
        assert_eq!(selection.plans.len(), 1);
        assert_eq!(selection.plans[0].fixture.key, "short");
        assert_eq!(selection.plans[0].len(), 1);
    }

    #[test]
    fn test_select_without_match_warns() {
        let (_dir, mut suite) = suite();
        suite.add_fixtures("fixtures/*").unwrap();

        let selection = suite.select(&Selector::from("*.csv")).unwrap();
        assert!(selection.plans.is_empty());
        let warning = selection.warning.unwrap();
        assert_eq!(warning.total, 2);
        assert_eq!(warning.selector, Selector::from("*.csv"));
    }

    #[derive(Default)]
    struct RecordingReporter {
        no_match: Vec<NoMatchWarning>,
    }

    impl Reporter for RecordingReporter {
        fn no_match(&mut self, warning: &NoMatchWarning) {
            self.no_match.push(warning.clone());
        }
    }

    #[test]
    fn test_run_reports_no_match() {
        let (_dir, mut suite) = suite();
        suite.add_fixtures("fixtures/*").unwrap();
        suite.add_code("code/*.js").unwrap();

        let mut reporter = RecordingReporter::default();
        let reports = suite.run(&Selector::from("*.csv"), &mut reporter).unwrap();
        assert!(reports.is_empty());
        assert_eq!(reporter.no_match.len(), 1);
        assert_eq!(reporter.no_match[0].selector, Selector::from("*.csv"));
        assert_eq!(reporter.no_match[0].total, 2);

        let records = suite
            .dry_run(&Selector::from("*.csv"), false, &mut reporter)
            .unwrap();
        assert!(records.is_empty());
        assert_eq!(reporter.no_match.len(), 2);

        let matched = suite
            .dry_run(&Selector::from("short"), false, &mut reporter)
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(reporter.no_match.len(), 2);
    }

    #[test]
    fn test_rename_rule_applies_to_both_registries() {
        let (dir, _) = suite();
        let mut suite = Suite::with_rename_rule(
            dir.path(),
            Arc::new(FnResolver::new().register_fn("upper", |_| json!(null))),
            RenameRule::Property("basename".into()),
        );
        suite.add_fixtures("fixtures/short.txt").unwrap();
        suite.add_code("code/upper.js").unwrap();
        assert!(suite.fixtures().get_by_key("short.txt").is_some());
        assert!(suite.code().get_by_key("upper.js").is_some());
    }

    #[test]
    fn test_dry_run_invokes_each_pair() {
        let (_dir, mut suite) = suite();
        suite.add_fixtures("fixtures/*").unwrap();
        suite.add_code("code/*").unwrap();

        let records = suite
            .dry_run(&Selector::All, false, &mut SilentReporter)
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fixture, "long");
        assert_eq!(records[0].actual, Some(json!("ABCDEFGHIJ")));
    }
}
