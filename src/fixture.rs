//! Setup/teardown brackets shared by test cases.
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! struct Scratch;
//!
//! impl Fixture for Scratch {
//!     type Context = Vec<u8>;
//!
//!     fn name(&self) -> &str {
//!         "scratch"
//!     }
//!
//!     fn setup(&self, _t: &mut Checker<'_>, buf: &mut Vec<u8>) -> Outcome {
//!         buf.extend_from_slice(b"seed");
//!         Ok(())
//!     }
//! }
//!
//! let case = Test::case_with("reads-seed", Scratch, |t, buf| {
//!     ensure!(t, buf.as_slice() == b"seed");
//!     Ok(())
//! });
//! assert_eq!(case.run(None), 0);
//! ```

use std::sync::Arc;

use crate::check::{Checker, Outcome};

/// Reusable setup/teardown bracket.
///
/// `Context` is created with `Default` right before setup and dropped after
/// teardown; it never outlives one case execution. Use `()` when the cases
/// need no shared state.
pub trait Fixture: Send + Sync {
    type Context: Default;

    fn name(&self) -> &str;

    /// Runs before the body. Hard checks here abort the case; teardown still
    /// runs.
    fn setup(&self, _t: &mut Checker<'_>, _context: &mut Self::Context) -> Outcome {
        Ok(())
    }

    /// Runs after the body, however it ended. `fails` counts every failure of
    /// the case so far, including the one that aborted it.
    fn teardown(&self, _fails: usize, _context: &mut Self::Context) {}
}

impl<X: Fixture + ?Sized> Fixture for Arc<X> {
    type Context = X::Context;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn setup(&self, t: &mut Checker<'_>, context: &mut Self::Context) -> Outcome {
        (**self).setup(t, context)
    }

    fn teardown(&self, fails: usize, context: &mut Self::Context) {
        (**self).teardown(fails, context)
    }
}

/// Runs `body` between the fixture's setup and teardown.
pub(crate) fn bracket<X, F>(fixture: &X, t: &mut Checker<'_>, body: &F) -> Outcome
where
    X: Fixture + ?Sized,
    F: Fn(&mut Checker<'_>, &mut X::Context) -> Outcome,
{
    let test = t.name();
    let mut context = X::Context::default();

    t.runner_mut().hooks_mut().before_setup(fixture.name(), test);
    let outcome = match fixture.setup(t, &mut context) {
        Ok(()) => {
            t.runner_mut().hooks_mut().after_setup(fixture.name(), test);
            body(t, &mut context)
        }
        Err(abort) => Err(abort),
    };

    let fails = t.failures();
    t.runner_mut()
        .hooks_mut()
        .before_teardown(fixture.name(), test, fails);
    fixture.teardown(fails, &mut context);
    t.runner_mut()
        .hooks_mut()
        .after_teardown(fixture.name(), test, fails);

    outcome
}
