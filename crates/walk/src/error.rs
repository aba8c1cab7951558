use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Step of the walk that failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WalkErrorKind {
    /// The root could not be resolved or inspected; nothing was walked.
    Root,
    /// A directory could not be opened for listing.
    ListDirectory,
    /// Listing a directory failed part way through.
    ReadEntry,
    /// A listed entry could not be inspected, often because it vanished after
    /// its directory was listed.
    InspectEntry,
}

impl fmt::Display for WalkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Root => "cannot inspect walk root",
            Self::ListDirectory => "cannot list directory",
            Self::ReadEntry => "cannot finish listing directory",
            Self::InspectEntry => "cannot inspect entry",
        })
    }
}

/// A filesystem failure that ended a walk.
///
/// The walker yields at most one error and then stops, so the error records
/// where in the tree it stopped.
#[derive(Debug, Error)]
#[error("{kind} '{}': {source}", .path.display())]
pub struct WalkError {
    kind: WalkErrorKind,
    path: PathBuf,
    relative_path: PathBuf,
    source: io::Error,
}

impl WalkError {
    pub(crate) fn root(path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: WalkErrorKind::Root,
            path,
            relative_path: PathBuf::new(),
            source,
        }
    }

    pub(crate) fn list_directory(path: PathBuf, relative_path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: WalkErrorKind::ListDirectory,
            path,
            relative_path,
            source,
        }
    }

    pub(crate) fn read_entry(path: PathBuf, relative_path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: WalkErrorKind::ReadEntry,
            path,
            relative_path,
            source,
        }
    }

    pub(crate) fn inspect_entry(path: PathBuf, relative_path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: WalkErrorKind::InspectEntry,
            path,
            relative_path,
            source,
        }
    }

    /// Which step failed.
    #[must_use]
    pub const fn kind(&self) -> WalkErrorKind {
        self.kind
    }

    /// Absolute path the failing operation was applied to.
    ///
    /// # Examples
    ///
    /// ```
    /// use walk::{WalkBuilder, WalkErrorKind};
    ///
    /// let error = match WalkBuilder::new("./definitely_missing_root").build() {
    ///     Ok(_) => panic!("missing root yields error"),
    ///     Err(error) => error,
    /// };
    /// assert_eq!(error.kind(), WalkErrorKind::Root);
    /// assert!(error.path().ends_with("definitely_missing_root"));
    /// ```
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the failure below the walk root, empty at the root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// The operating system error.
    #[must_use]
    pub fn io_error(&self) -> &io::Error {
        &self.source
    }
}
