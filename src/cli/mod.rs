//! Ready-made `main` for test programs.
//!
//! ```rust,no_run
//! use std::process::ExitCode;
//! use trellis::prelude::*;
//!
//! fn all() -> Test {
//!     Test::suite("all", [Test::case("smoke", |t| {
//!         ensure!(t, 2 * 2 == 4);
//!         Ok(())
//!     })])
//! }
//!
//! fn main() -> ExitCode {
//!     trellis::cli::run(&all())
//! }
//! ```
//!
//! The exit status is the total failure count, clamped to 255, so 0 means
//! every selected test passed.

use std::cell::RefCell;
use std::io::{self, Write};
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use termcolor::StandardStream;
use tracing::{debug, Level};

use crate::config::RunConfig;
use crate::error::Result;
use crate::hooks::HookChain;
use crate::listing;
use crate::metadata::Test;
use crate::registry::Registry;
use crate::report::{ConsoleLogger, ProgressReporter, Summary};
use crate::runner::Runner;

pub mod args;

pub use args::TrellisArgs;

/// Parses the process arguments and runs `root`.
pub fn run(root: &Test) -> ExitCode {
    run_with_args(root, TrellisArgs::parse())
}

/// Runs `root` with already parsed arguments.
pub fn run_with_args(root: &Test, args: TrellisArgs) -> ExitCode {
    match execute(root, &args) {
        Ok(fails) => exit_code(fails),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::FAILURE
        }
    }
}

/// Exit status for a failure count.
pub fn exit_code(fails: usize) -> ExitCode {
    ExitCode::from(exit_status(fails))
}

fn exit_status(fails: usize) -> u8 {
    u8::try_from(fails).unwrap_or(u8::MAX)
}

fn settings(args: &TrellisArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(filter) = args.filter {
        config.filter = filter;
    }
    if let Some(color) = args.color {
        config.color = color;
    }
    if args.quiet {
        config.progress = false;
        config.summary = false;
    }
    config.verbose |= args.verbose;
    Ok(config)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    // A host may have installed its own subscriber already.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

/// Runs the selected tests and returns the total failure count. Listing
/// modes return 0.
fn execute(root: &Test, args: &TrellisArgs) -> Result<usize> {
    let config = settings(args)?;
    init_logging(config.verbose);

    let mut registry = Registry::new();
    registry.register(root.clone())?;
    debug!(units = registry.len(), "registered test tree");

    if args.list {
        let mut stdout = io::stdout().lock();
        listing::write_tree(root, &mut stdout)?;
        return Ok(0);
    }
    if args.json {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", listing::to_json(root)?)?;
        return Ok(0);
    }

    let choice = config.color.choice();
    let summary = Rc::new(RefCell::new(Summary::default()));
    let mut hooks = HookChain::new().with(summary.clone());
    if config.progress {
        hooks.push(ProgressReporter::stdout(choice));
    }
    let mut runner = Runner::builder()
        .boxed_filter(config.filter.build())
        .hooks(hooks)
        .logger(ConsoleLogger::stdout(choice))
        .build();

    let fails = if args.conditions.is_empty() {
        registry.run(&mut runner, None)
    } else {
        args.conditions
            .iter()
            .map(|cond| registry.run(&mut runner, Some(cond.as_str())))
            .sum()
    };

    if config.summary {
        let mut stdout = StandardStream::stdout(choice);
        summary.borrow().write(&mut stdout)?;
    }
    Ok(fails)
}
