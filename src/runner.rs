//! Execution of test units.
//!
//! A [`Runner`] bundles the filter, hooks, and failure logger of a run. It is
//! configured once and then walks any number of trees:
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! let root = Test::suite("root", [
//!     Test::case("ok", |_| Ok(())),
//!     Test::case("broken", |t| {
//!         ensure!(t, false);
//!         Ok(())
//!     }),
//! ]);
//!
//! let mut runner = Runner::builder().filter(NameFilter).build();
//! assert_eq!(runner.run(&root, None), 1);
//! assert_eq!(runner.run(&root, Some("ok")), 0);
//! assert_eq!(runner.run(&root, Some("broken")), 1);
//! ```

use tracing::debug;

use crate::check::Checker;
use crate::filter::{Filter, FilterResult, NameFilter};
use crate::hooks::{FailureLogger, Hooks, NoHooks, NoLogger};
use crate::metadata::{CaseBody, Test, TestMetadata, UnitKind};

/// Runs test units and aggregates their failure counts.
pub struct Runner {
    filter: Box<dyn Filter>,
    hooks: Box<dyn Hooks>,
    logger: Box<dyn FailureLogger>,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            filter: Box::new(NameFilter),
            hooks: Box::new(NoHooks),
            logger: Box::new(NoLogger),
        }
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::default()
    }

    /// Runs `test` under condition `cond` and returns its failure count.
    ///
    /// With no condition the unit and everything below it runs. Otherwise the
    /// filter decides, unit by unit.
    pub fn run(&mut self, test: &Test, cond: Option<&str>) -> usize {
        let decision = self.decide(test, cond);
        match test.kind() {
            UnitKind::Case(body) => {
                if decision.runs_self() {
                    self.run_case(test, body.as_ref())
                } else {
                    0
                }
            }
            UnitKind::Suite(subtests) => match decision {
                FilterResult::Pass => self.run_suite(test, subtests, None),
                FilterResult::PassPropagate => self.run_suite(test, subtests, cond),
                FilterResult::SkipPropagate => subtests.iter().map(|s| self.run(s, cond)).sum(),
                FilterResult::Skip => 0,
            },
        }
    }

    fn decide(&self, test: &TestMetadata, cond: Option<&str>) -> FilterResult {
        let Some(cond) = cond else {
            return FilterResult::Pass;
        };
        let decision = self.filter.filter(test, cond);
        debug!(test = test.name(), cond, ?decision, "filtered");
        decision
    }

    fn run_case(&mut self, test: &Test, body: &CaseBody) -> usize {
        let name = test.name();
        self.hooks.case_enter(name);
        debug!(case = name, "enter");

        let mut checker = Checker::new(self, name);
        if body(&mut checker).is_err() {
            debug!(case = name, "aborted");
        }
        let fails = checker.failures();

        debug!(case = name, fails, "leave");
        self.hooks.case_leave(name, fails);
        fails
    }

    fn run_suite(&mut self, test: &Test, subtests: &[Test], cond: Option<&str>) -> usize {
        let name = test.name();
        let count = subtests.len();
        self.hooks.suite_enter(name, count);
        debug!(suite = name, subtests = count, "enter");

        let mut fails = 0;
        for (index, subtest) in subtests.iter().enumerate() {
            self.hooks
                .before_subtest(name, count, fails, index, subtest.name());
            let subtest_fails = self.run(subtest, cond);
            fails += subtest_fails;
            self.hooks
                .after_subtest(name, count, fails, index, subtest.name(), subtest_fails);
        }

        debug!(suite = name, fails, "leave");
        self.hooks.suite_leave(name, count, fails);
        fails
    }

    pub(crate) fn hooks_mut(&mut self) -> &mut dyn Hooks {
        self.hooks.as_mut()
    }

    pub(crate) fn logger_mut(&mut self) -> &mut dyn FailureLogger {
        self.logger.as_mut()
    }
}

/// Configures a [`Runner`]. Anything left unset keeps its default: name
/// filtering, no hooks, no failure logging.
#[derive(Default)]
pub struct RunnerBuilder {
    filter: Option<Box<dyn Filter>>,
    hooks: Option<Box<dyn Hooks>>,
    logger: Option<Box<dyn FailureLogger>>,
}

impl RunnerBuilder {
    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn boxed_filter(mut self, filter: Box<dyn Filter>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn hooks(mut self, hooks: impl Hooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    pub fn logger(mut self, logger: impl FailureLogger + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    pub fn build(self) -> Runner {
        let defaults = Runner::default();
        Runner {
            filter: self.filter.unwrap_or(defaults.filter),
            hooks: self.hooks.unwrap_or(defaults.hooks),
            logger: self.logger.unwrap_or(defaults.logger),
        }
    }
}
