//! Command-line interface module for datesort.
//!
//! This module handles argument parsing and wires the parsed options through
//! configuration, the reorganizer and the console reporter.

use crate::config::RunOptions;
use crate::output::{ConsoleReporter, Reporter};
use crate::pattern::GroupIndices;
use crate::reorganizer::{Reorganizer, RunSummary};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Move files into YYYY_MM_DD directories using dates found in their names.
///
/// Entries under SOURCE whose name matches PATTERN are moved to
/// DESTINATION/YYYY_MM_DD/, the date fields being taken from the capture
/// groups selected with --year, --month and --day.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "datesort")]
#[command(author, version, about)]
pub struct Args {
    /// The directory to scan (defaults to the current directory)
    #[arg(short = 'f', long = "from", value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// The directory where matching files go; without it nothing is moved
    #[arg(short = 't', long = "to", value_name = "DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Regular expression matched against entry names
    #[arg(short, long, value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Organise by EXIF data (not supported, ignored)
    #[arg(short, long)]
    pub exif: bool,

    /// Index of the year in the regular expression capture groups
    #[arg(short, long, value_name = "YEAR", default_value_t = 0)]
    pub year: usize,

    /// Index of the month in the regular expression capture groups
    #[arg(short, long, value_name = "MONTH", default_value_t = 0)]
    pub month: usize,

    /// Index of the day in the regular expression capture groups
    #[arg(short, long, value_name = "DAY", default_value_t = 0)]
    pub day: usize,

    /// Number of matching entries to process before stopping (0 = no limit)
    #[arg(
        short,
        long,
        value_name = "LIMIT",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub limit: i64,

    /// Show what would be moved without touching the filesystem
    #[arg(short, long)]
    pub simulate: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log lines as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Args {
    /// Converts the parsed arguments into run options.
    pub fn to_options(&self) -> RunOptions {
        RunOptions {
            source: self.source.clone(),
            destination: self.destination.clone(),
            pattern: self.pattern.clone(),
            groups: GroupIndices::new(self.year, self.month, self.day),
            limit: self.limit,
            simulate: self.simulate,
            exif: self.exif,
        }
    }
}

/// Runs a reorganization for `args`, reporting to stdout.
///
/// # Errors
///
/// Fails on an invalid pattern or when the source root cannot be walked.
pub fn run_cli(args: &Args) -> anyhow::Result<RunSummary> {
    run_with_reporter(args, &mut ConsoleReporter::stdout())
}

/// Runs a reorganization for `args`, sending per-entry outcomes to `reporter`.
///
/// The reporter's `finish` is called whenever the walk ends normally or on the
/// item limit.
pub fn run_with_reporter<R: Reporter>(args: &Args, reporter: &mut R) -> anyhow::Result<RunSummary> {
    let config = args
        .to_options()
        .build()
        .context("Error compiling pattern")?;

    let summary = Reorganizer::new(&config, reporter)
        .run()
        .context("Error reorganizing source tree")?;

    reporter.finish(&summary);
    Ok(summary)
}
