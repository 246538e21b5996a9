//! Terminal reporting: failure lines, progress lines, and the end-of-run
//! summary.
//!
//! All writers take any [`WriteColor`], so the same code renders colored
//! output to a terminal and plain text into a buffer.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::warn;

use crate::check::{CheckKind, Failure};
use crate::hooks::{FailureLogger, Hooks};

fn paint<W: WriteColor>(out: &mut W, color: Color, bold: bool, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold))?;
    write!(out, "{}", text)?;
    out.reset()
}

/// Renders each failure as `[KIND] file(line) : condition | message`.
pub struct ConsoleLogger<W> {
    out: W,
}

impl ConsoleLogger<StandardStream> {
    pub fn stdout(choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> ConsoleLogger<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_failure(&mut self, failure: &Failure<'_>) -> io::Result<()> {
        paint(
            &mut self.out,
            Color::Red,
            true,
            &format!("[{}]", failure.kind),
        )?;
        write!(self.out, " {} : {}", failure.location, failure.condition)?;
        if let Some(message) = failure.message {
            write!(self.out, " | {}", message)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: WriteColor> FailureLogger for ConsoleLogger<W> {
    fn log_failure(&mut self, failure: &Failure<'_>) {
        if let Err(err) = self.write_failure(failure) {
            warn!(%err, "could not write failure report");
        }
    }
}

/// Indented `begin NAME` / `end NAME` lines around every unit. The `end` line
/// is left out when the unit failed, so failures stand out between the
/// `begin` and the next line.
pub struct ProgressReporter<W> {
    out: W,
    depth: usize,
}

impl ProgressReporter<StandardStream> {
    pub fn stdout(choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn begin(&mut self, name: &str) {
        let result = writeln!(self.out, "{:indent$}begin {}", "", name, indent = self.depth * 2);
        self.depth += 1;
        if let Err(err) = result {
            warn!(%err, "could not write progress");
        }
    }

    fn end(&mut self, name: &str, fails: usize) {
        self.depth = self.depth.saturating_sub(1);
        if fails > 0 {
            return;
        }
        let result = write!(self.out, "{:indent$}", "", indent = self.depth * 2)
            .and_then(|()| paint(&mut self.out, Color::Green, false, "end"))
            .and_then(|()| writeln!(self.out, " {}", name));
        if let Err(err) = result {
            warn!(%err, "could not write progress");
        }
    }
}

impl<W: WriteColor> Hooks for ProgressReporter<W> {
    fn case_enter(&mut self, name: &str) {
        self.begin(name);
    }

    fn case_leave(&mut self, name: &str, fails: usize) {
        self.end(name, fails);
    }

    fn suite_enter(&mut self, name: &str, _subtests: usize) {
        self.begin(name);
    }

    fn suite_leave(&mut self, name: &str, _subtests: usize, fails: usize) {
        self.end(name, fails);
    }
}

/// Collects totals over a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Cases that ran.
    pub cases: usize,
    /// Names of cases with at least one failure, in completion order.
    pub failed_cases: Vec<String>,
    /// Failures summed over all cases.
    pub failures: usize,
    /// Hard and soft checks evaluated.
    pub checks: usize,
    pub failed_checks: usize,
}

impl Summary {
    pub fn passed(&self) -> usize {
        self.cases - self.failed_cases.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_cases.is_empty()
    }

    pub fn write<W: WriteColor>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "\nTest summary: {} cases, ", self.cases)?;
        paint(out, Color::Green, false, "passed")?;
        write!(out, " {}, ", self.passed())?;
        paint(out, Color::Red, false, "failed")?;
        writeln!(
            out,
            " {} ({} checks, {} failed)",
            self.failed_cases.len(),
            self.checks,
            self.failed_checks
        )?;

        if self.has_failures() {
            writeln!(out, "\nFailed tests:")?;
            for name in &self.failed_cases {
                writeln!(out, "  - {}", name)?;
            }
        }
        Ok(())
    }
}

impl Hooks for Summary {
    fn case_leave(&mut self, name: &str, fails: usize) {
        self.cases += 1;
        if fails > 0 {
            self.failures += fails;
            self.failed_cases.push(name.to_string());
        }
    }

    fn after_assert(&mut self, _kind: CheckKind, _condition: &str, failed: bool) {
        self.checks += 1;
        if failed {
            self.failed_checks += 1;
        }
    }
}
