//! Shared helpers for the trellis integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use trellis::{CheckKind, Failure, Hooks};

/// Hooks that write every event as a short line into a shared log.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.borrow_mut().push(event.into());
    }

    /// Failure logger writing `fail KIND condition [message]` into the same log.
    pub fn logger(&self) -> impl FnMut(&Failure<'_>) + 'static {
        let events = self.events.clone();
        move |failure: &Failure<'_>| {
            let mut line = format!("fail {} {}", failure.kind, failure.condition);
            if let Some(message) = failure.message {
                line.push_str(&format!(" [{}]", message));
            }
            events.borrow_mut().push(line);
        }
    }
}

impl Hooks for Recorder {
    fn case_enter(&mut self, name: &str) {
        self.push(format!("case_enter {}", name));
    }

    fn case_leave(&mut self, name: &str, fails: usize) {
        self.push(format!("case_leave {} {}", name, fails));
    }

    fn suite_enter(&mut self, name: &str, subtests: usize) {
        self.push(format!("suite_enter {} {}", name, subtests));
    }

    fn suite_leave(&mut self, name: &str, subtests: usize, fails: usize) {
        self.push(format!("suite_leave {} {} {}", name, subtests, fails));
    }

    fn before_subtest(&mut self, suite: &str, _subtests: usize, fails: usize, index: usize, name: &str) {
        self.push(format!("before_subtest {} {} {} {}", suite, fails, index, name));
    }

    fn after_subtest(
        &mut self,
        suite: &str,
        _subtests: usize,
        fails: usize,
        index: usize,
        name: &str,
        subtest_fails: usize,
    ) {
        self.push(format!(
            "after_subtest {} {} {} {} {}",
            suite, fails, index, name, subtest_fails
        ));
    }

    fn before_setup(&mut self, fixture: &str, test: &str) {
        self.push(format!("before_setup {} {}", fixture, test));
    }

    fn after_setup(&mut self, fixture: &str, test: &str) {
        self.push(format!("after_setup {} {}", fixture, test));
    }

    fn before_teardown(&mut self, fixture: &str, test: &str, fails: usize) {
        self.push(format!("before_teardown {} {} {}", fixture, test, fails));
    }

    fn after_teardown(&mut self, fixture: &str, test: &str, fails: usize) {
        self.push(format!("after_teardown {} {} {}", fixture, test, fails));
    }

    fn before_assert(&mut self, kind: CheckKind, condition: &str) {
        self.push(format!("before_assert {} {}", kind, condition));
    }

    fn after_assert(&mut self, kind: CheckKind, condition: &str, failed: bool) {
        self.push(format!("after_assert {} {} {}", kind, condition, failed));
    }
}

/// Events matching one of the given prefixes, in order.
pub fn only(events: &[String], prefixes: &[&str]) -> Vec<String> {
    events
        .iter()
        .filter(|e| prefixes.iter().any(|p| e.starts_with(p)))
        .cloned()
        .collect()
}
