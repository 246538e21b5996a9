//! Run configuration.
//!
//! Values come from defaults, then an optional YAML file, then command-line
//! flags. A config file looks like:
//!
//! ```yaml
//! color: never
//! filter: tag
//! progress: false
//! summary: true
//! ```

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;
use termcolor::ColorChoice;

use crate::error::{Result, TrellisError};
use crate::filter::{Filter, NameFilter, PatternFilter, TagFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

/// How selection conditions are matched against units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Exact unit name.
    #[default]
    Name,
    /// Unit tag or exact name.
    Tag,
    /// Regular expression over unit names.
    Pattern,
}

impl FilterMode {
    pub fn build(self) -> Box<dyn Filter> {
        match self {
            FilterMode::Name => Box::new(NameFilter),
            FilterMode::Tag => Box::new(TagFilter),
            FilterMode::Pattern => Box::new(PatternFilter::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub color: ColorMode,
    pub filter: FilterMode,
    /// Print `begin`/`end` lines around every unit.
    pub progress: bool,
    /// Print the totals after the run.
    pub summary: bool,
    /// Debug-level logging to stderr.
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            filter: FilterMode::Name,
            progress: true,
            summary: true,
            verbose: false,
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| TrellisError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parses YAML content; `path` only labels errors. An empty document
    /// yields the defaults.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| TrellisError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
