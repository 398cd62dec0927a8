//! Comparison Planner
//!
//! Pairs each selected fixture with every registered code entry.
//!
//! A plan snapshots the code registry when it is built: entries added
//! afterwards are not part of it. Candidate order is registry order.

use fixbench_core::{FileEntry, FileRegistry};
use fixbench_report::FixtureInfo;
use std::sync::Arc;

/// One fixture and the candidates to run against it
#[derive(Debug, Clone)]
pub struct ComparisonPlan {
    /// Fixture entry
    pub fixture: Arc<FileEntry>,
    /// Code entries, in registry order
    pub candidates: Vec<Arc<FileEntry>>,
}

impl ComparisonPlan {
    /// Number of comparisons
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when there is nothing to compare
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Report header for the fixture
    pub fn fixture_info(&self) -> FixtureInfo {
        FixtureInfo::from(self.fixture.as_ref())
    }
}

/// Build the plan for `fixture` against the current contents of `code`
pub fn build_plan(fixture: Arc<FileEntry>, code: &FileRegistry) -> ComparisonPlan {
    let candidates = code.list().to_vec();
    tracing::debug!(
        "Planned {} against {} candidate(s)",
        fixture.key,
        candidates.len()
    );
    ComparisonPlan {
        fixture,
        candidates,
    }
}

/// Build one plan per fixture, preserving fixture order
pub fn build_plans(
    fixtures: impl IntoIterator<Item = Arc<FileEntry>>,
    code: &FileRegistry,
) -> Vec<ComparisonPlan> {
    fixtures
        .into_iter()
        .map(|fixture| build_plan(fixture, code))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixbench_core::FnResolver;
    use serde_json::json;

    fn setup() -> (tempfile::TempDir, FileRegistry, FileRegistry) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("short.txt"), "abc").unwrap();
        let mut fixtures = FileRegistry::fixtures(dir.path());
        fixtures.add("short.txt").unwrap();

        let resolver = FnResolver::new()
            .register_fn("a", |_| json!(1))
            .register_fn("b", |_| json!(2))
            .register_fn("c", |_| json!(3));
        let code = FileRegistry::code(dir.path(), Arc::new(resolver));
        (dir, fixtures, code)
    }

    #[test]
    fn test_plan_snapshots_code_registry() {
        let (_dir, fixtures, mut code) = setup();
        code.add("a.js").unwrap();
        code.add("b.js").unwrap();

        let plan = build_plan(Arc::clone(&fixtures.list()[0]), &code);
        code.add("c.js").unwrap();

        assert_eq!(plan.len(), 2);
        let names: Vec<_> = plan.candidates.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(code.len(), 3);
    }

    #[test]
    fn test_empty_code_registry() {
        let (_dir, fixtures, code) = setup();
        let plans = build_plans(fixtures.list().iter().cloned(), &code);
        assert_eq!(plans.len(), 1);
        assert!(plans[0].is_empty());
        assert_eq!(plans[0].fixture_info().size_label(), "(3 bytes)");
    }
}
