/// Destination planning and the move primitive.
///
/// Entries are relocated to `<destination>/<YYYY_MM_DD>/<name>`. The dated
/// directory is created on demand; name collisions are left to the
/// platform's rename semantics.
use crate::pattern::DateParts;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where a matched entry should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// The `YYYY_MM_DD` directory name.
    pub dir_name: String,
    /// `<destination>/<dir_name>`.
    pub target_dir: PathBuf,
    /// `<destination>/<dir_name>/<name>`.
    pub destination: PathBuf,
}

/// Computes the move plan for an entry called `base_name` dated `date`.
///
/// `base_name` is joined as is, so names that are not valid UTF-8 are kept
/// byte for byte.
///
/// # Examples
///
/// ```
/// use datesort::file_organizer::plan;
/// use datesort::pattern::DateParts;
/// use std::path::Path;
///
/// let date = DateParts { year: 2021, month: 7, day: 4 };
/// let plan = plan(Path::new("/out"), &date, "party.jpg");
/// assert_eq!(plan.destination, Path::new("/out/2021_07_04/party.jpg"));
/// ```
pub fn plan(destination_root: &Path, date: &DateParts, base_name: impl AsRef<Path>) -> MovePlan {
    let dir_name = date.dir_name();
    let target_dir = destination_root.join(&dir_name);
    let destination = target_dir.join(base_name);
    MovePlan {
        dir_name,
        target_dir,
        destination,
    }
}

/// Errors raised while relocating a single entry.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Failed to create the dated directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to rename the entry into the dated directory.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for relocation operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Carries out move plans on the filesystem.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Creates the plan's target directory (recursively, idempotently) and
    /// renames `source` to the planned destination.
    ///
    /// The two steps are not atomic: if the rename fails the target directory
    /// is left in place.
    pub fn relocate(source: &Path, plan: &MovePlan) -> OrganizeResult<()> {
        fs::create_dir_all(&plan.target_dir).map_err(|e| {
            OrganizeError::DirectoryCreationFailed {
                path: plan.target_dir.clone(),
                source: e,
            }
        })?;

        fs::rename(source, &plan.destination).map_err(|e| OrganizeError::FileMoveFailure {
            from: source.to_path_buf(),
            to: plan.destination.clone(),
            source: e,
        })
    }
}
