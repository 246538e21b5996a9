//! The static test tree.
//!
//! A [`Test`] is a cheap, shareable handle to an immutable [`TestMetadata`]
//! node. Leaves are cases (a body of checks), inner nodes are suites (an
//! ordered list of subtests). Trees are built once, usually into a
//! `once_cell::sync::Lazy` static, and never mutated while running.
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! let root = Test::suite("math", [
//!     Test::case("add", |t| {
//!         ensure!(t, 1 + 1 == 2);
//!         Ok(())
//!     }),
//!     Test::case("sub", |t| {
//!         verify!(t, 3 - 1 == 2);
//!         Ok(())
//!     }),
//! ]);
//! assert_eq!(root.subtest_count(), 2);
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;

use crate::check::{Checker, Outcome};
use crate::fixture::{self, Fixture};
use crate::runner::Runner;

/// Where a test or a check was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the caller of the enclosing `#[track_caller]` function.
    #[track_caller]
    pub fn caller() -> Self {
        let caller = std::panic::Location::caller();
        Self {
            file: caller.file(),
            line: caller.line(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.file, self.line)
    }
}

pub(crate) type CaseBody = dyn Fn(&mut Checker<'_>) -> Outcome + Send + Sync;

#[derive(Clone)]
pub(crate) enum UnitKind {
    Case(Arc<CaseBody>),
    Suite(Vec<Test>),
}

/// Immutable descriptor of a test case or suite.
#[derive(Clone)]
pub struct TestMetadata {
    name: String,
    location: Location,
    tags: Vec<String>,
    kind: UnitKind,
}

impl TestMetadata {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn file(&self) -> &'static str {
        self.location.file
    }

    pub fn line(&self) -> u32 {
        self.location.line
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_suite(&self) -> bool {
        matches!(self.kind, UnitKind::Suite(_))
    }

    /// Number of direct subtests; always 0 for a case.
    pub fn subtest_count(&self) -> usize {
        self.subtests().len()
    }

    /// Direct subtests in registration order; empty for a case.
    pub fn subtests(&self) -> &[Test] {
        match &self.kind {
            UnitKind::Case(_) => &[],
            UnitKind::Suite(subtests) => subtests,
        }
    }

    pub(crate) fn kind(&self) -> &UnitKind {
        &self.kind
    }
}

impl fmt::Debug for TestMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMetadata")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("tags", &self.tags)
            .field("subtests", &self.subtests())
            .finish()
    }
}

/// Shared handle to a registered test unit.
///
/// Cloning is cheap and keeps pointing at the same node, so one case can be
/// listed under several suites.
#[derive(Clone)]
pub struct Test(Arc<TestMetadata>);

impl Test {
    /// Declares a test case without a fixture.
    #[track_caller]
    pub fn case<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Checker<'_>) -> Outcome + Send + Sync + 'static,
    {
        Self::new(name.into(), Location::caller(), UnitKind::Case(Arc::new(body)))
    }

    /// Declares a test case bracketed by `fixture`.
    ///
    /// A fresh `X::Context` is created for every execution and handed to
    /// setup, the body, and teardown in that order. Teardown runs even when
    /// the body aborts.
    #[track_caller]
    pub fn case_with<X, F>(name: impl Into<String>, fixture: X, body: F) -> Self
    where
        X: Fixture + 'static,
        F: Fn(&mut Checker<'_>, &mut X::Context) -> Outcome + Send + Sync + 'static,
    {
        let bracketed = move |t: &mut Checker<'_>| fixture::bracket(&fixture, t, &body);
        Self::new(
            name.into(),
            Location::caller(),
            UnitKind::Case(Arc::new(bracketed)),
        )
    }

    /// Declares a suite running `subtests` in the given order.
    ///
    /// A suite needs at least one subtest; [`Registry::register`](crate::Registry::register)
    /// rejects empty ones.
    #[track_caller]
    pub fn suite<I>(name: impl Into<String>, subtests: I) -> Self
    where
        I: IntoIterator<Item = Test>,
    {
        Self::new(
            name.into(),
            Location::caller(),
            UnitKind::Suite(subtests.into_iter().collect()),
        )
    }

    fn new(name: String, location: Location, kind: UnitKind) -> Self {
        Self(Arc::new(TestMetadata {
            name,
            location,
            tags: Vec::new(),
            kind,
        }))
    }

    /// Adds a tag, used by tag-based filters.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.0).tags.push(tag.into());
        self
    }

    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tags.into_iter().fold(self, |test, tag| test.with_tag(tag))
    }

    pub fn metadata(&self) -> &TestMetadata {
        &self.0
    }

    /// Whether both handles point at the same registration.
    pub fn ptr_eq(&self, other: &Test) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Runs this unit with an unconfigured runner and returns its failure count.
    pub fn run(&self, cond: Option<&str>) -> usize {
        Runner::default().run(self, cond)
    }
}

impl Deref for Test {
    type Target = TestMetadata;

    fn deref(&self) -> &TestMetadata {
        &self.0
    }
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
