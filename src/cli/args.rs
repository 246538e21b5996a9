//! Command-line arguments of a test program built on trellis.
//!
//! Uses the `clap` derive API; every flag overrides the matching key of the
//! config file.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{ColorMode, FilterMode};

#[derive(Debug, Parser)]
#[command(version, about = "Run the tests of this program.")]
pub struct TrellisArgs {
    /// Conditions selecting what to run. Each one runs against the whole tree
    /// and the failures are added up. Runs everything when empty.
    pub conditions: Vec<String>,

    /// Print the test tree instead of running it.
    #[arg(long, conflicts_with = "json")]
    pub list: bool,

    /// Print the test tree as JSON instead of running it.
    #[arg(long)]
    pub json: bool,

    /// How conditions match units.
    #[arg(long, value_enum)]
    pub filter: Option<FilterMode>,

    /// When to use colors.
    #[arg(long, value_enum)]
    pub color: Option<ColorMode>,

    /// Only print failures.
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug-level logging to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// YAML file with run settings.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
