//! Name index over registered test trees.

use std::collections::HashMap;

use crate::error::{Result, TrellisError};
use crate::metadata::Test;
use crate::runner::Runner;
use crate::traverse::{visit, VisitStep};

/// Registered roots plus a lookup of every unit below them by name.
///
/// The same unit may be reachable from several places; two different units
/// sharing a name are rejected, since a name must select one unit.
#[derive(Debug, Default)]
pub struct Registry {
    roots: Vec<Test>,
    by_name: HashMap<String, Test>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `root` and all its descendants. Nothing is registered if any
    /// name clashes or any suite is empty.
    pub fn register(&mut self, root: Test) -> Result<()> {
        let mut pending: HashMap<String, Test> = HashMap::new();
        let mut rejected: Option<TrellisError> = None;
        visit(&root, |test, step| {
            if step != VisitStep::Enter || rejected.is_some() {
                return;
            }
            if test.is_suite() && test.subtest_count() == 0 {
                rejected = Some(TrellisError::EmptySuite {
                    name: test.name().to_string(),
                    location: test.location(),
                });
                return;
            }
            let existing = self
                .by_name
                .get(test.name())
                .or_else(|| pending.get(test.name()))
                .map(|existing| (existing.ptr_eq(test), existing.location()));
            match existing {
                Some((false, first)) => {
                    rejected = Some(TrellisError::DuplicateTest {
                        name: test.name().to_string(),
                        first,
                        second: test.location(),
                    });
                }
                Some((true, _)) => {}
                None => {
                    pending.insert(test.name().to_string(), test.clone());
                }
            }
        });
        if let Some(err) = rejected {
            return Err(err);
        }

        self.by_name.extend(pending);
        self.roots.push(root);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Test> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn roots(&self) -> &[Test] {
        &self.roots
    }

    /// Every registered name, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of distinct units registered.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Runs every root in registration order and sums their failures.
    pub fn run(&self, runner: &mut Runner, cond: Option<&str>) -> usize {
        self.roots.iter().map(|root| runner.run(root, cond)).sum()
    }
}
