//! datesort - move files into dated directories
//!
//! This library walks a directory tree, extracts a date from each entry name
//! with a user supplied regular expression and relocates matching entries to
//! `YYYY_MM_DD` subdirectories of a destination root, or only reports what it
//! would do in simulation mode.

pub mod cli;
pub mod config;
pub mod file_organizer;
pub mod output;
pub mod pattern;
pub mod reorganizer;

pub use config::{ConfigError, RunConfig, RunMode, RunOptions, SimulationCause};
pub use file_organizer::{FileOrganizer, MovePlan, OrganizeError};
pub use output::{ConsoleReporter, Reporter};
pub use pattern::{DateMatch, DateParts, GroupIndices, Matcher, PatternMatcher};
pub use reorganizer::{
    MoveOutcome, Reorganizer, RunCounters, RunStatus, RunSummary, SkipReason, TraversalError,
};

pub use cli::{Args, run_cli};
