//! Errors of the harness itself.
//!
//! Test failures are never errors: they are counted and returned by the
//! runner. What ends up here is misuse of the harness (duplicate names) and
//! I/O around it (config files, listings).

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::metadata::Location;

#[derive(Debug, Error, Diagnostic)]
pub enum TrellisError {
    #[error("duplicate test name `{name}` declared at {first} and {second}")]
    #[diagnostic(
        code(trellis::registry::duplicate),
        help("names select tests for filtering, so every distinct test needs its own")
    )]
    DuplicateTest {
        name: String,
        first: Location,
        second: Location,
    },

    #[error("suite `{name}` declared at {location} has no subtests")]
    #[diagnostic(
        code(trellis::registry::empty_suite),
        help("a suite needs at least one subtest; declare a case instead")
    )]
    EmptySuite { name: String, location: Location },

    #[error("failed to read config file `{}`", .path.display())]
    #[diagnostic(code(trellis::config::io))]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file `{}`", .path.display())]
    #[diagnostic(
        code(trellis::config::parse),
        help("expected a YAML mapping with keys such as `color`, `filter`, `progress`, `summary`")
    )]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write output")]
    #[diagnostic(code(trellis::output))]
    Output(#[from] std::io::Error),

    #[error("failed to serialize the test tree")]
    #[diagnostic(code(trellis::output::json))]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = TrellisError> = std::result::Result<T, E>;
