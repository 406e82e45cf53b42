//! Run configuration.
//!
//! Raw inputs (`RunOptions`, usually filled from the command line) are turned
//! into an immutable `RunConfig` by [`RunOptions::build`]. Building is where
//! the pattern is compiled, the limit normalized and the run mode decided:
//!
//! - an explicit simulate request always wins and nothing is created
//! - an empty destination means a simulation-only run
//! - otherwise the destination root is created, and a failure to do so demotes
//!   the whole run to simulation instead of aborting it

use crate::pattern::{GroupIndices, Matcher};
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors that abort a run before any traversal happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The filename pattern is not a valid regular expression.
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Raw, unvalidated options for a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Root to scan. Defaults to the current directory.
    pub source: Option<PathBuf>,
    /// Root receiving organized entries. `None` means simulation only.
    pub destination: Option<PathBuf>,
    /// Regular expression applied to entry names.
    pub pattern: Option<String>,
    pub groups: GroupIndices,
    /// Maximum number of planned entries; zero or negative is unlimited.
    pub limit: i64,
    pub simulate: bool,
    /// Accepted for compatibility; EXIF based sorting is not implemented.
    pub exif: bool,
}

/// Why a run does not touch the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationCause {
    /// Simulation was asked for.
    Requested,
    /// No destination root was given.
    NoDestination,
    /// The destination root could not be created.
    DestinationUnavailable,
}

/// Whether planned moves are carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Move,
    Simulate(SimulationCause),
}

impl RunMode {
    pub fn is_simulation(&self) -> bool {
        matches!(self, Self::Simulate(_))
    }
}

/// Validated configuration for a single run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: PathBuf,
    /// Destination root; empty when none was given.
    pub destination: PathBuf,
    pub matcher: Matcher,
    pub groups: GroupIndices,
    pub limit: Option<NonZeroUsize>,
    pub mode: RunMode,
}

impl RunOptions {
    /// Validates the options and prepares the destination root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if the pattern does not compile.
    /// Failing to create the destination is not an error: the run is demoted
    /// to simulation mode.
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let source = match self.source {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => {
                warn!("no source path specified, assuming current directory");
                PathBuf::from(".")
            }
        };

        if self.exif {
            warn!("EXIF based organisation is not supported, ignoring --exif");
        }

        let matcher = Matcher::from_pattern(self.pattern.as_deref())?;
        if !matcher.is_enabled() {
            debug!("no pattern specified, matching is disabled");
        }

        let limit = usize::try_from(self.limit).ok().and_then(NonZeroUsize::new);
        let destination = self.destination.unwrap_or_default();

        let mode = if self.simulate {
            RunMode::Simulate(SimulationCause::Requested)
        } else if destination.as_os_str().is_empty() {
            RunMode::Simulate(SimulationCause::NoDestination)
        } else {
            match fs::create_dir_all(&destination) {
                Ok(()) => RunMode::Move,
                Err(e) => {
                    error!(path = %destination.display(), error = %e, "error creating directory");
                    RunMode::Simulate(SimulationCause::DestinationUnavailable)
                }
            }
        };

        Ok(RunConfig {
            source,
            destination,
            matcher,
            groups: self.groups,
            limit,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(temp: &TempDir) -> RunOptions {
        RunOptions {
            source: Some(temp.path().to_path_buf()),
            destination: Some(temp.path().join("out")),
            pattern: Some(r"(\d{4})-(\d{2})-(\d{2})".to_string()),
            groups: GroupIndices::new(1, 2, 3),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_to_current_directory() {
        let config = RunOptions::default().build().unwrap();
        assert_eq!(config.source, PathBuf::from("."));
        assert!(!config.matcher.is_enabled());
        assert_eq!(config.limit, None);
    }

    #[test]
    fn test_missing_destination_forces_simulation() {
        let config = RunOptions::default().build().unwrap();
        assert_eq!(
            config.mode,
            RunMode::Simulate(SimulationCause::NoDestination)
        );
    }

    #[test]
    fn test_destination_is_created() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let config = options(&temp).build().unwrap();

        assert_eq!(config.mode, RunMode::Move);
        assert!(temp.path().join("out").is_dir());
    }

    #[test]
    fn test_simulation_does_not_create_destination() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let config = RunOptions {
            simulate: true,
            ..options(&temp)
        }
        .build()
        .unwrap();

        assert_eq!(config.mode, RunMode::Simulate(SimulationCause::Requested));
        assert!(!temp.path().join("out").exists());
    }

    #[test]
    fn test_unavailable_destination_demotes_to_simulation() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let config = RunOptions {
            destination: Some(blocker.join("out")),
            ..options(&temp)
        }
        .build()
        .unwrap();

        assert_eq!(
            config.mode,
            RunMode::Simulate(SimulationCause::DestinationUnavailable)
        );
        assert!(config.mode.is_simulation());
    }

    #[test]
    fn test_non_positive_limit_is_unlimited() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        for limit in [0, -1, -50] {
            let config = RunOptions {
                limit,
                ..options(&temp)
            }
            .build()
            .unwrap();
            assert_eq!(config.limit, None);
        }

        let config = RunOptions {
            limit: 3,
            ..options(&temp)
        }
        .build()
        .unwrap();
        assert_eq!(config.limit, NonZeroUsize::new(3));
    }

    #[test]
    fn test_invalid_pattern_is_fatal() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let result = RunOptions {
            pattern: Some("[invalid(".to_string()),
            ..options(&temp)
        }
        .build();

        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }
}
