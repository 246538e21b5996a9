//! Checks, failure records, and the abort signal.
//!
//! A case body receives a [`Checker`] scoped to that one execution. Every
//! check goes through the same path: the before-assert hook, a single
//! evaluation of the condition, the after-assert hook, and, on failure, an
//! increment of the case's failure counter plus a call to the failure logger.
//!
//! Hard checks ([`ensure!`](crate::ensure)) then return [`Abort`] from the
//! body through `?`, which the runner catches at the case boundary. Soft
//! checks ([`verify!`](crate::verify)) let the body carry on.

use std::fmt;

use tracing::trace;

use crate::metadata::{Location, Test};
use crate::runner::Runner;

/// Kind tag attached to every check and failure record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// Hard check: a failure aborts the rest of the case.
    Assert,
    /// Soft check: a failure is recorded and the case continues.
    Verify,
    /// Failure raised directly by client code with its own tag.
    Custom(&'static str),
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Assert => "ASSERT",
            CheckKind::Verify => "VERIFY",
            CheckKind::Custom(tag) => tag,
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal that stops the current case body.
///
/// Only a [`Checker`] hands these out, so an abort always has a case boundary
/// to return to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "return the abort from the test body to stop the case"]
pub struct Abort {
    _private: (),
}

/// Result of a case body, fixture setup, or hard check.
pub type Outcome = Result<(), Abort>;

/// Everything the failure logger gets to see about one failed check.
#[derive(Debug, Clone, Copy)]
pub struct Failure<'a> {
    pub location: Location,
    pub kind: CheckKind,
    /// The condition as written in the source.
    pub condition: &'a str,
    /// Optional user message, formatted lazily.
    pub message: Option<fmt::Arguments<'a>>,
}

/// Per-execution state of one test case: its name, its failure counter, and
/// the runner it reports to.
pub struct Checker<'r> {
    runner: &'r mut Runner,
    name: &'r str,
    fails: usize,
}

impl<'r> Checker<'r> {
    pub(crate) fn new(runner: &'r mut Runner, name: &'r str) -> Self {
        Self {
            runner,
            name,
            fails: 0,
        }
    }

    /// Name of the running case.
    pub fn name(&self) -> &'r str {
        self.name
    }

    /// Failures recorded so far in this case.
    pub fn failures(&self) -> usize {
        self.fails
    }

    /// Stops the case without recording a failure.
    ///
    /// ```rust
    /// # use trellis::prelude::*;
    /// let case = Test::case("early-exit", |t| {
    ///     if t.failures() == 0 {
    ///         return t.abort();
    ///     }
    ///     unreachable!()
    /// });
    /// assert_eq!(case.run(None), 0);
    /// ```
    pub fn abort(&self) -> Outcome {
        Err(Abort { _private: () })
    }

    /// Counts a failure and forwards it to the failure logger.
    pub fn record_failure(&mut self, failure: &Failure<'_>) {
        self.fails += 1;
        self.runner.logger_mut().log_failure(failure);
    }

    /// Runs another unit from inside this case.
    ///
    /// The nested unit gets its own counter; its failures are returned, not
    /// added to this case.
    pub fn run(&mut self, test: &Test, cond: Option<&str>) -> usize {
        self.runner.run(test, cond)
    }

    #[doc(hidden)]
    pub fn begin_check(&mut self, kind: CheckKind, condition: &str) {
        self.runner.hooks_mut().before_assert(kind, condition);
    }

    #[doc(hidden)]
    pub fn end_check(
        &mut self,
        kind: CheckKind,
        location: Location,
        condition: &str,
        failed: bool,
        message: Option<fmt::Arguments<'_>>,
    ) -> Outcome {
        self.runner.hooks_mut().after_assert(kind, condition, failed);
        trace!(case = self.name, %kind, condition, failed, "check evaluated");
        if !failed {
            return Ok(());
        }
        self.record_failure(&Failure {
            location,
            kind,
            condition,
            message,
        });
        match kind {
            CheckKind::Assert => self.abort(),
            CheckKind::Verify | CheckKind::Custom(_) => Ok(()),
        }
    }

    pub(crate) fn runner_mut(&mut self) -> &mut Runner {
        self.runner
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check {
    ($t:expr, $kind:expr, $cond:expr, $message:expr) => {{
        let kind = $kind;
        let condition = ::core::stringify!($cond);
        $t.begin_check(kind, condition);
        let passed: bool = $cond;
        $t.end_check(
            kind,
            $crate::Location::new(::core::file!(), ::core::line!()),
            condition,
            !passed,
            $message,
        )
    }};
}

/// Hard check. On failure, records it and returns [`Abort`] from the
/// enclosing body, skipping everything after it.
///
/// ```rust
/// # use trellis::prelude::*;
/// let case = Test::case("hard", |t| {
///     let answer = 41;
///     ensure!(t, answer == 42, "answer was {}", answer);
///     unreachable!()
/// });
/// assert_eq!(case.run(None), 1);
/// ```
#[macro_export]
macro_rules! ensure {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::__check!($t, $crate::CheckKind::Assert, $cond, ::core::option::Option::None)?
    };
    ($t:expr, $cond:expr, $($arg:tt)+) => {
        $crate::__check!(
            $t,
            $crate::CheckKind::Assert,
            $cond,
            ::core::option::Option::Some(::core::format_args!($($arg)+))
        )?
    };
}

/// Soft check. On failure, records it and keeps going.
///
/// ```rust
/// # use trellis::prelude::*;
/// let case = Test::case("soft", |t| {
///     verify!(t, 1 == 2);
///     verify!(t, 2 == 3, "still running");
///     Ok(())
/// });
/// assert_eq!(case.run(None), 2);
/// ```
#[macro_export]
macro_rules! verify {
    ($t:expr, $cond:expr $(,)?) => {{
        let _ = $crate::__check!($t, $crate::CheckKind::Verify, $cond, ::core::option::Option::None);
    }};
    ($t:expr, $cond:expr, $($arg:tt)+) => {{
        let _ = $crate::__check!(
            $t,
            $crate::CheckKind::Verify,
            $cond,
            ::core::option::Option::Some(::core::format_args!($($arg)+))
        );
    }};
}

/// Records a failure with a custom kind tag and description, without
/// aborting. Pair with `return t.abort()` for a hard custom failure.
///
/// ```rust
/// # use trellis::prelude::*;
/// let case = Test::case("custom", |t| {
///     fail!(t, "TIMEOUT", "response took too long", "{} ms", 1200);
///     Ok(())
/// });
/// assert_eq!(case.run(None), 1);
/// ```
#[macro_export]
macro_rules! fail {
    ($t:expr, $kind:literal, $test:expr $(,)?) => {
        $t.record_failure(&$crate::Failure {
            location: $crate::Location::new(::core::file!(), ::core::line!()),
            kind: $crate::CheckKind::Custom($kind),
            condition: $test,
            message: ::core::option::Option::None,
        })
    };
    ($t:expr, $kind:literal, $test:expr, $($arg:tt)+) => {
        $t.record_failure(&$crate::Failure {
            location: $crate::Location::new(::core::file!(), ::core::line!()),
            kind: $crate::CheckKind::Custom($kind),
            condition: $test,
            message: ::core::option::Option::Some(::core::format_args!($($arg)+)),
        })
    };
}
