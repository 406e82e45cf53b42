//! Output formatting and styling module.
//!
//! One colored line is written per visited entry, followed by a summary block
//! once the walk ends. Reporting never influences control flow.

use crate::config::{RunMode, SimulationCause};
use crate::reorganizer::{MoveOutcome, RunStatus, RunSummary};
use colored::*;
use std::io::{self, Write};
use std::path::Path;
use tracing::warn;

/// Receives the outcome of every visited entry.
pub trait Reporter {
    /// Called once per entry, in traversal order.
    fn report(&mut self, outcome: &MoveOutcome);

    /// Called once when the walk ends, before the process exits.
    fn finish(&mut self, _summary: &RunSummary) {}
}

/// Writes color-coded progress lines to a writer (stdout by default).
///
/// - `name: moving <src> to <dst>... OK!` in white, `OK!` in green
/// - `... KO! (<cause>)` in red when the move failed
/// - `... SKIP!` in white when simulating
/// - `name: no match` in red
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Gives back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_attempt(&mut self, name: &str, source: &Path, destination: &Path) -> io::Result<()> {
        let line = format!(
            "{}: moving {} to {}...",
            name,
            source.display(),
            destination.display()
        );
        write!(self.out, "{}", line.white())
    }

    fn write_outcome(&mut self, outcome: &MoveOutcome) -> io::Result<()> {
        match outcome {
            MoveOutcome::Skipped { name, .. } => {
                writeln!(self.out, "{}", format!("{}: no match", name).red())
            }
            MoveOutcome::Simulated {
                name,
                source,
                destination,
            } => {
                self.write_attempt(name, source, destination)?;
                writeln!(self.out, "{}", " SKIP!".white())
            }
            MoveOutcome::Succeeded {
                name,
                source,
                destination,
            } => {
                self.write_attempt(name, source, destination)?;
                writeln!(self.out, "{}", " OK!".green())
            }
            MoveOutcome::Failed {
                name,
                source,
                destination,
                cause,
            } => {
                self.write_attempt(name, source, destination)?;
                writeln!(self.out, "{}", format!(" KO! ({})", cause).red())
            }
        }
    }

    fn write_summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        let counters = &summary.counters;
        writeln!(self.out, "\n{}", "SUMMARY".bold())?;
        for (label, count) in [
            ("Planned", counters.planned),
            ("Moved", counters.moved),
            ("Simulated", counters.simulated),
            ("Failed", counters.failed),
            ("Unmatched", counters.unmatched),
        ] {
            writeln!(self.out, "{:<10} | {}", label, count.to_string().green())?;
        }

        if summary.status == RunStatus::LimitReached {
            writeln!(
                self.out,
                "{} Limit reached, remaining entries were not visited",
                "⚠".yellow()
            )?;
        }
        if let RunMode::Simulate(cause) = summary.mode {
            let reason = match cause {
                SimulationCause::Requested => "simulation requested",
                SimulationCause::NoDestination => "no destination given",
                SimulationCause::DestinationUnavailable => "destination could not be created",
            };
            writeln!(
                self.out,
                "{}",
                format!("[DRY RUN] No files were modified ({})", reason).yellow()
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, outcome: &MoveOutcome) {
        if let Err(e) = self.write_outcome(outcome) {
            warn!(entry = outcome.name(), error = %e, "failed to write report line");
        }
    }

    fn finish(&mut self, summary: &RunSummary) {
        if let Err(e) = self.write_summary(summary) {
            warn!(error = %e, "failed to write summary");
        }
    }
}
