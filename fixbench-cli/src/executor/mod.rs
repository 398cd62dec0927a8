//! Suite Executor
//!
//! Runs comparison plans and turns the outcomes into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ComparisonPlan (fixture + code snapshot)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Measure each candidate (or invoke once in a dry run)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build Report with metadata and summary
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Timed and dry-run execution
//! - [`reporter`] - Progress reporting
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - System metadata collection

mod execution;
mod formatting;
mod metadata;
mod report;
mod reporter;

pub use execution::{CandidateExecutionError, DryRunExecutor, Executor};
pub use formatting::{format_duration, format_human_output, format_listing};
pub use metadata::build_report_meta;
pub use report::build_report;
pub use reporter::{ConsoleReporter, Reporter, SilentReporter};
