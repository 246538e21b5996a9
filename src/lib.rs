//! # Trellis
//!
//! A small hierarchical unit-testing harness. Test cases and suites are
//! declared as an ordinary tree of [`Test`] values, run selectively through a
//! [`Runner`], and report failures as counts instead of terminating the
//! process.
//!
//! - **Cases** hold a body of checks: [`ensure!`] aborts the case on failure,
//!   [`verify!`] records the failure and carries on.
//! - **Suites** run their subtests in order and add up their failures.
//! - **Fixtures** bracket a case with setup and teardown; teardown always runs.
//! - **Filters** select what runs for a given condition string.
//! - **Hooks** and a **failure logger** observe a run without changing it.
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! let root = Test::suite("strings", [
//!     Test::case("upper", |t| {
//!         ensure!(t, "abc".to_uppercase() == "ABC");
//!         Ok(())
//!     }),
//!     Test::case("trim", |t| {
//!         verify!(t, " a ".trim() == "a", "trim left {:?}", " a ".trim());
//!         Ok(())
//!     }),
//! ]);
//!
//! assert_eq!(Runner::new().run(&root, None), 0);
//! ```

pub use crate::check::{Abort, CheckKind, Checker, Failure, Outcome};
pub use crate::error::{Result, TrellisError};
pub use crate::filter::{Filter, FilterResult, NameFilter, PatternFilter, TagFilter};
pub use crate::fixture::Fixture;
pub use crate::hooks::{FailureLogger, HookChain, Hooks, NoHooks, NoLogger};
pub use crate::metadata::{Location, Test, TestMetadata};
pub use crate::registry::Registry;
pub use crate::runner::{Runner, RunnerBuilder};
pub use crate::traverse::{traverse, visit, VisitStep};

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod fixture;
pub mod hooks;
pub mod listing;
pub mod metadata;
pub mod registry;
pub mod report;
pub mod runner;
pub mod traverse;

/// Version of the harness.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a test program usually needs.
pub mod prelude {
    pub use crate::check::{Checker, Outcome};
    pub use crate::filter::{Filter, FilterResult, NameFilter, PatternFilter, TagFilter};
    pub use crate::fixture::Fixture;
    pub use crate::hooks::{FailureLogger, Hooks};
    pub use crate::metadata::{Test, TestMetadata};
    pub use crate::runner::Runner;
    pub use crate::{ensure, fail, verify};
}
