//! Instrumentation points of a run.
//!
//! Every method has a no-op default, so an unconfigured runner behaves
//! exactly like one with [`NoHooks`] and [`NoLogger`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::check::{CheckKind, Failure};

/// Callbacks around units, subtests, fixtures, and checks.
#[allow(unused_variables)]
pub trait Hooks {
    fn case_enter(&mut self, name: &str) {}

    fn case_leave(&mut self, name: &str, fails: usize) {}

    fn suite_enter(&mut self, name: &str, subtests: usize) {}

    fn suite_leave(&mut self, name: &str, subtests: usize, fails: usize) {}

    /// `fails` is the suite's aggregate before this subtest runs.
    fn before_subtest(
        &mut self,
        suite: &str,
        subtests: usize,
        fails: usize,
        index: usize,
        name: &str,
    ) {
    }

    /// `fails` is the suite's aggregate including this subtest,
    /// `subtest_fails` the subtest's own count.
    fn after_subtest(
        &mut self,
        suite: &str,
        subtests: usize,
        fails: usize,
        index: usize,
        name: &str,
        subtest_fails: usize,
    ) {
    }

    fn before_setup(&mut self, fixture: &str, test: &str) {}

    fn after_setup(&mut self, fixture: &str, test: &str) {}

    fn before_teardown(&mut self, fixture: &str, test: &str, fails: usize) {}

    fn after_teardown(&mut self, fixture: &str, test: &str, fails: usize) {}

    fn before_assert(&mut self, kind: CheckKind, condition: &str) {}

    fn after_assert(&mut self, kind: CheckKind, condition: &str, failed: bool) {}
}

/// Receives every failed check.
pub trait FailureLogger {
    fn log_failure(&mut self, failure: &Failure<'_>);
}

impl<F> FailureLogger for F
where
    F: FnMut(&Failure<'_>),
{
    fn log_failure(&mut self, failure: &Failure<'_>) {
        self(failure)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl Hooks for NoHooks {}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoLogger;

impl FailureLogger for NoLogger {
    fn log_failure(&mut self, _failure: &Failure<'_>) {}
}

/// Shared handle, so the caller can read collected state back after the
/// runner is done with it.
impl<H: Hooks + ?Sized> Hooks for Rc<RefCell<H>> {
    fn case_enter(&mut self, name: &str) {
        self.borrow_mut().case_enter(name)
    }

    fn case_leave(&mut self, name: &str, fails: usize) {
        self.borrow_mut().case_leave(name, fails)
    }

    fn suite_enter(&mut self, name: &str, subtests: usize) {
        self.borrow_mut().suite_enter(name, subtests)
    }

    fn suite_leave(&mut self, name: &str, subtests: usize, fails: usize) {
        self.borrow_mut().suite_leave(name, subtests, fails)
    }

    fn before_subtest(
        &mut self,
        suite: &str,
        subtests: usize,
        fails: usize,
        index: usize,
        name: &str,
    ) {
        self.borrow_mut()
            .before_subtest(suite, subtests, fails, index, name)
    }

    fn after_subtest(
        &mut self,
        suite: &str,
        subtests: usize,
        fails: usize,
        index: usize,
        name: &str,
        subtest_fails: usize,
    ) {
        self.borrow_mut()
            .after_subtest(suite, subtests, fails, index, name, subtest_fails)
    }

    fn before_setup(&mut self, fixture: &str, test: &str) {
        self.borrow_mut().before_setup(fixture, test)
    }

    fn after_setup(&mut self, fixture: &str, test: &str) {
        self.borrow_mut().after_setup(fixture, test)
    }

    fn before_teardown(&mut self, fixture: &str, test: &str, fails: usize) {
        self.borrow_mut().before_teardown(fixture, test, fails)
    }

    fn after_teardown(&mut self, fixture: &str, test: &str, fails: usize) {
        self.borrow_mut().after_teardown(fixture, test, fails)
    }

    fn before_assert(&mut self, kind: CheckKind, condition: &str) {
        self.borrow_mut().before_assert(kind, condition)
    }

    fn after_assert(&mut self, kind: CheckKind, condition: &str, failed: bool) {
        self.borrow_mut().after_assert(kind, condition, failed)
    }
}

/// Forwards every event to each member in order.
#[derive(Default)]
pub struct HookChain {
    hooks: Vec<Box<dyn Hooks>>,
}

impl HookChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: impl Hooks + 'static) -> Self {
        self.push(hooks);
        self
    }

    pub fn push(&mut self, hooks: impl Hooks + 'static) {
        self.hooks.push(Box::new(hooks));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl Hooks for HookChain {
    fn case_enter(&mut self, name: &str) {
        self.hooks.iter_mut().for_each(|h| h.case_enter(name));
    }

    fn case_leave(&mut self, name: &str, fails: usize) {
        self.hooks.iter_mut().for_each(|h| h.case_leave(name, fails));
    }

    fn suite_enter(&mut self, name: &str, subtests: usize) {
        self.hooks
            .iter_mut()
            .for_each(|h| h.suite_enter(name, subtests));
    }

    fn suite_leave(&mut self, name: &str, subtests: usize, fails: usize) {
        self.hooks
            .iter_mut()
            .for_each(|h| h.suite_leave(name, subtests, fails));
    }

    fn before_subtest(
        &mut self,
        suite: &str,
        subtests: usize,
        fails: usize,
        index: usize,
        name: &str,
    ) {
        for h in &mut self.hooks {
            h.before_subtest(suite, subtests, fails, index, name);
        }
    }

    fn after_subtest(
        &mut self,
        suite: &str,
        subtests: usize,
        fails: usize,
        index: usize,
        name: &str,
        subtest_fails: usize,
    ) {
        for h in &mut self.hooks {
            h.after_subtest(suite, subtests, fails, index, name, subtest_fails);
        }
    }

    fn before_setup(&mut self, fixture: &str, test: &str) {
        self.hooks
            .iter_mut()
            .for_each(|h| h.before_setup(fixture, test));
    }

    fn after_setup(&mut self, fixture: &str, test: &str) {
        self.hooks
            .iter_mut()
            .for_each(|h| h.after_setup(fixture, test));
    }

    fn before_teardown(&mut self, fixture: &str, test: &str, fails: usize) {
        self.hooks
            .iter_mut()
            .for_each(|h| h.before_teardown(fixture, test, fails));
    }

    fn after_teardown(&mut self, fixture: &str, test: &str, fails: usize) {
        self.hooks
            .iter_mut()
            .for_each(|h| h.after_teardown(fixture, test, fails));
    }

    fn before_assert(&mut self, kind: CheckKind, condition: &str) {
        self.hooks
            .iter_mut()
            .for_each(|h| h.before_assert(kind, condition));
    }

    fn after_assert(&mut self, kind: CheckKind, condition: &str, failed: bool) {
        self.hooks
            .iter_mut()
            .for_each(|h| h.after_assert(kind, condition, failed));
    }
}
