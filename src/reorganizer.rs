//! Directory walk and per-entry reorganization.
//!
//! Every entry of the source tree, directories included, is matched, planned
//! and moved (or simulated). Failures on one entry are reported and the walk
//! moves on; only a failure to read the source root stops the run.

use crate::config::{RunConfig, RunMode};
use crate::file_organizer::{self, FileOrganizer, OrganizeError};
use crate::output::Reporter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// The source root could not be walked.
#[derive(Debug, Error)]
#[error("Error walking path {}: {source}", path.display())]
pub struct TraversalError {
    pub path: PathBuf,
    #[source]
    pub source: walkdir::Error,
}

/// Why an entry was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No pattern is configured.
    MatcherDisabled,
    /// The name did not yield a valid date.
    NoMatch,
}

/// What happened to a single entry.
#[derive(Debug)]
pub enum MoveOutcome {
    Skipped {
        name: String,
        reason: SkipReason,
    },
    Simulated {
        name: String,
        source: PathBuf,
        destination: PathBuf,
    },
    Succeeded {
        name: String,
        source: PathBuf,
        destination: PathBuf,
    },
    Failed {
        name: String,
        source: PathBuf,
        destination: PathBuf,
        cause: OrganizeError,
    },
}

impl MoveOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Skipped { name, .. }
            | Self::Simulated { name, .. }
            | Self::Succeeded { name, .. }
            | Self::Failed { name, .. } => name,
        }
    }

    /// True when the entry produced a move plan, whatever happened next.
    pub fn is_planned(&self) -> bool {
        !matches!(self, Self::Skipped { .. })
    }
}

/// Per-run tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Entries that matched and were planned; this is what the limit counts.
    pub planned: usize,
    pub moved: usize,
    pub simulated: usize,
    pub failed: usize,
    pub unmatched: usize,
}

impl RunCounters {
    fn record(&mut self, outcome: &MoveOutcome) {
        match outcome {
            MoveOutcome::Skipped { .. } => self.unmatched += 1,
            MoveOutcome::Simulated { .. } => self.simulated += 1,
            MoveOutcome::Succeeded { .. } => self.moved += 1,
            MoveOutcome::Failed { .. } => self.failed += 1,
        }
        if outcome.is_planned() {
            self.planned += 1;
        }
    }
}

/// How the walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every entry was visited.
    Completed,
    /// The item limit was reached and the remaining entries were not visited.
    LimitReached,
}

/// Final result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub status: RunStatus,
    pub counters: RunCounters,
    pub mode: RunMode,
}

/// Walks the source tree of a `RunConfig`, reporting each entry.
pub struct Reorganizer<'a, R: Reporter> {
    config: &'a RunConfig,
    reporter: &'a mut R,
    counters: RunCounters,
}

impl<'a, R: Reporter> Reorganizer<'a, R> {
    pub fn new(config: &'a RunConfig, reporter: &'a mut R) -> Self {
        Self {
            config,
            reporter,
            counters: RunCounters::default(),
        }
    }

    /// Walks the source tree in file name order until it is exhausted or the
    /// limit is reached.
    ///
    /// # Errors
    ///
    /// Returns a `TraversalError` when the source root cannot be read. Errors
    /// reading deeper directories are logged and skipped.
    pub fn run(mut self) -> Result<RunSummary, TraversalError> {
        info!(source = %self.config.source.display(), mode = ?self.config.mode, "walking source tree");

        let mut walker = WalkDir::new(&self.config.source)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = walker.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(TraversalError {
                        path: e
                            .path()
                            .map(Path::to_path_buf)
                            .unwrap_or_else(|| self.config.source.clone()),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "error walking path, skipping");
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();
            if name == "." || name == ".." {
                continue;
            }

            let outcome = self.visit(&entry);
            // A moved directory no longer exists at the path the walker would descend into.
            if entry.file_type().is_dir() && matches!(outcome, MoveOutcome::Succeeded { .. }) {
                walker.skip_current_dir();
            }

            self.counters.record(&outcome);
            self.reporter.report(&outcome);

            if self.limit_reached() {
                info!(planned = self.counters.planned, "limit reached, stopping");
                return Ok(self.summary(RunStatus::LimitReached));
            }
        }

        Ok(self.summary(RunStatus::Completed))
    }

    fn visit(&self, entry: &DirEntry) -> MoveOutcome {
        // Lossy text is only for matching and reporting; the move keeps the raw name.
        let name = entry.file_name().to_string_lossy().into_owned();
        let source = entry.path().to_path_buf();

        if !self.config.matcher.is_enabled() {
            return MoveOutcome::Skipped {
                name,
                reason: SkipReason::MatcherDisabled,
            };
        }

        let Some(date) = self.config.matcher.date_of(&name, &self.config.groups) else {
            return MoveOutcome::Skipped {
                name,
                reason: SkipReason::NoMatch,
            };
        };

        let plan = file_organizer::plan(&self.config.destination, &date, entry.file_name());
        debug!(%name, dir = %plan.dir_name, "planned move");

        if self.config.mode.is_simulation() {
            return MoveOutcome::Simulated {
                name,
                source,
                destination: plan.destination,
            };
        }

        match FileOrganizer::relocate(&source, &plan) {
            Ok(()) => MoveOutcome::Succeeded {
                name,
                source,
                destination: plan.destination,
            },
            Err(cause) => MoveOutcome::Failed {
                name,
                source,
                destination: plan.destination,
                cause,
            },
        }
    }

    fn limit_reached(&self) -> bool {
        self.config
            .limit
            .is_some_and(|limit| self.counters.planned >= limit.get())
    }

    fn summary(&self, status: RunStatus) -> RunSummary {
        RunSummary {
            status,
            counters: self.counters,
            mode: self.config.mode,
        }
    }
}
