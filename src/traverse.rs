//! Read-only walks over the test tree.
//!
//! Nothing here runs a test body or touches failure counters.

use crate::metadata::Test;

/// Step reported by [`visit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitStep {
    Enter,
    Leave,
}

/// Calls `proc(name, subtest_count)` on every unit, depth-first, pre-order.
pub fn traverse<F>(test: &Test, mut proc: F)
where
    F: FnMut(&str, usize),
{
    fn walk<F: FnMut(&str, usize)>(test: &Test, proc: &mut F) {
        proc(test.name(), test.subtest_count());
        for subtest in test.subtests() {
            walk(subtest, proc);
        }
    }
    walk(test, &mut proc);
}

/// Calls `proc(unit, Enter)` before a unit's subtests and `proc(unit, Leave)`
/// after them.
pub fn visit<F>(test: &Test, mut proc: F)
where
    F: FnMut(&Test, VisitStep),
{
    fn walk<F: FnMut(&Test, VisitStep)>(test: &Test, proc: &mut F) {
        proc(test, VisitStep::Enter);
        for subtest in test.subtests() {
            walk(subtest, proc);
        }
        proc(test, VisitStep::Leave);
    }
    walk(test, &mut proc);
}

/// First unit named `name` in pre-order, `root` included.
pub fn find(root: &Test, name: &str) -> Option<Test> {
    if root.name() == name {
        return Some(root.clone());
    }
    root.subtests().iter().find_map(|subtest| find(subtest, name))
}

/// Number of test cases (leaves) under `root`, `root` included.
pub fn count_cases(root: &Test) -> usize {
    let mut cases = 0;
    visit(root, |test, step| {
        if step == VisitStep::Enter && !test.is_suite() {
            cases += 1;
        }
    });
    cases
}
