//! Selection of the units to run for a given condition.
//!
//! The runner asks its filter about every unit it meets while a condition is
//! set. A suite that does not match still lets the filter look at its
//! subtests, which is how a condition naming a deeply nested case reaches it.

use std::cell::RefCell;

use regex::Regex;
use tracing::warn;

use crate::metadata::TestMetadata;

/// Decision taken for one unit before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterResult {
    /// No match: skip this unit and everything below it.
    Skip,
    /// Match: run this unit and everything below it unconditionally.
    Pass,
    /// No match: skip this unit but keep filtering its subtests.
    SkipPropagate,
    /// Match: run this unit but keep filtering its subtests.
    PassPropagate,
}

impl FilterResult {
    /// Whether the unit itself runs (hooks included).
    pub fn runs_self(self) -> bool {
        matches!(self, FilterResult::Pass | FilterResult::PassPropagate)
    }

    /// Whether subtests keep seeing the condition.
    pub fn propagates(self) -> bool {
        matches!(
            self,
            FilterResult::SkipPropagate | FilterResult::PassPropagate
        )
    }
}

/// Predicate consulted before running any unit while a condition is set.
pub trait Filter {
    fn filter(&self, test: &TestMetadata, cond: &str) -> FilterResult;
}

impl<F> Filter for F
where
    F: Fn(&TestMetadata, &str) -> FilterResult,
{
    fn filter(&self, test: &TestMetadata, cond: &str) -> FilterResult {
        self(test, cond)
    }
}

/// Default filter: exact name match.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameFilter;

impl Filter for NameFilter {
    fn filter(&self, test: &TestMetadata, cond: &str) -> FilterResult {
        if test.name() == cond {
            FilterResult::Pass
        } else {
            FilterResult::SkipPropagate
        }
    }
}

/// Matches units carrying `cond` as a tag, or named `cond`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagFilter;

impl Filter for TagFilter {
    fn filter(&self, test: &TestMetadata, cond: &str) -> FilterResult {
        if test.has_tag(cond) || test.name() == cond {
            FilterResult::Pass
        } else {
            FilterResult::SkipPropagate
        }
    }
}

/// Treats the condition as a regular expression over unit names.
///
/// A condition that is not a valid expression is matched literally.
#[derive(Debug, Default)]
pub struct PatternFilter {
    compiled: RefCell<Option<(String, Option<Regex>)>>,
}

impl PatternFilter {
    pub fn new() -> Self {
        Self::default()
    }

    fn compile(cond: &str) -> Option<Regex> {
        Regex::new(cond)
            .or_else(|err| {
                warn!(cond, %err, "invalid pattern, matching literally");
                Regex::new(&regex::escape(cond))
            })
            .ok()
    }
}

impl Filter for PatternFilter {
    fn filter(&self, test: &TestMetadata, cond: &str) -> FilterResult {
        let mut compiled = self.compiled.borrow_mut();
        let stale = compiled.as_ref().map_or(true, |(source, _)| source != cond);
        if stale {
            *compiled = Some((cond.to_string(), Self::compile(cond)));
        }
        let matched = compiled
            .as_ref()
            .and_then(|(_, regex)| regex.as_ref())
            .map_or(false, |regex| regex.is_match(test.name()));
        if matched {
            FilterResult::Pass
        } else {
            FilterResult::SkipPropagate
        }
    }
}
