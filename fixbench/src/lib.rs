#![warn(missing_docs)]
//! # FixBench
//!
//! Compare competing implementations of the same task over a set of fixture
//! files.
//!
//! - **Patterns**: fixtures and code are described by literal paths, globs,
//!   lists or named tables, resolved against a base directory
//! - **Selectors**: pick fixtures at run time by key, file name or path
//! - **Plans**: every selected fixture is run against every code entry
//! - **Ranking**: the fastest candidates and how far ahead of the rest they are
//! - **Dry runs**: invoke each candidate once and check its output
//!
//! ## Quick Start
//!
//! ```ignore
//! use fixbench::prelude::*;
//! use std::sync::Arc;
//!
//! let resolver = FnResolver::new()
//!     .register_fn("naive", |args| naive(args))
//!     .register_fn("fast", |args| fast(args));
//! let mut suite = Suite::new("benchmark", Arc::new(resolver));
//! suite.add_fixtures("fixtures/*.json")?;
//! suite.add_code(["code/naive.rs", "code/fast.rs"].to_vec())?;
//!
//! let reports = suite.run(&Selector::All, &mut ConsoleReporter::new())?;
//! print!("{}", render_human(&reports));
//! ```
//!
//! Code files run as scripts by default (`CommandResolver`); see the
//! `fixbench` binary and `fixbench.toml`.

// Re-export core types
pub use fixbench_core::{
    Candidate, Category, CodeResolver, CommandResolver, EngineError, FileEntry, FileMeta,
    FileRegistry, Fixture, FixtureContent, FnResolver, InvalidPatternError, InvalidSelectorError,
    Invoke, InvokeError, InvokeInput, MatchFilter, Measurement, NoMatchWarning, Pattern,
    PatternResolver, RenameRule, Resolution, ResourceLoadError, SamplingConfig, SamplingEngine,
    Selector, TimingEngine, candidate_fn, filter,
};

// Re-export session and execution
pub use fixbench_cli::{
    ComparisonPlan, ConsoleReporter, DryRunExecutor, Executor, FixConfig, Reporter, Selection,
    SilentReporter, Suite, build_plan, build_plans, build_report,
};

// Re-export reporting
pub use fixbench_report::{
    CandidateFailure, CandidateOutcome, DryRunRecord, RankedReport, Report, ResultAggregator,
    RunResult, aggregate, format_number, generate_json_report, render_dry_run, render_human,
};

// Re-export stats
pub use fixbench_stats::{OutlierFence, SampleSummary, summarize};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ConsoleReporter, FnResolver, Pattern, Selector, SilentReporter, Suite, render_human,
    };
}

/// Run the FixBench CLI.
///
/// ```ignore
/// fn main() {
///     fixbench::run().unwrap();
/// }
/// ```
pub use fixbench_cli::run;
