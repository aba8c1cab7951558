use std::error::Error;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use filters::ExclusionError;
use walk::WalkError;

use crate::process::ProcessError;

/// Error produced when a synchronization run fails.
///
/// The error identifies precisely which precondition or path failed. Turning
/// it into user-facing prose is left to the caller.
#[derive(Debug)]
pub struct SyncError {
    kind: SyncErrorKind,
}

/// Coarse classification of [`SyncError`] values.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorCategory {
    /// The request itself is unusable.
    InvalidRequest,
    /// The source tree does not exist at call time.
    SourceNotFound,
    /// A filesystem operation or the external tool failed.
    IoFailure,
}

impl SyncError {
    pub(crate) fn new(kind: SyncErrorKind) -> Self {
        Self { kind }
    }

    /// Constructs an error rejecting identical source and destination.
    #[must_use]
    pub fn same_source_and_destination(path: PathBuf) -> Self {
        Self::new(SyncErrorKind::SameSourceAndDestination { path })
    }

    /// Constructs an error reporting a missing source tree.
    #[must_use]
    pub fn source_not_found(path: PathBuf) -> Self {
        Self::new(SyncErrorKind::SourceNotFound { path })
    }

    /// Constructs an I/O error with action context.
    #[must_use]
    pub fn io(action: &'static str, path: PathBuf, source: io::Error) -> Self {
        Self::new(SyncErrorKind::Io {
            action,
            path,
            source,
        })
    }

    /// Constructs an error reporting an exceeded deadline.
    #[must_use]
    pub fn timed_out(limit: Duration) -> Self {
        Self::new(SyncErrorKind::TimedOut { limit })
    }

    /// Constructs an error reporting that the external tool cannot be found.
    #[must_use]
    pub fn tool_unavailable(program: &OsStr) -> Self {
        Self::new(SyncErrorKind::ToolUnavailable {
            program: program.to_os_string(),
        })
    }

    /// Provides access to the underlying error kind.
    #[must_use]
    pub fn kind(&self) -> &SyncErrorKind {
        &self.kind
    }

    /// Consumes the error and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> SyncErrorKind {
        self.kind
    }

    /// Returns the coarse category callers branch on.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self.kind {
            SyncErrorKind::SameSourceAndDestination { .. } | SyncErrorKind::InvalidExclusion(_) => {
                ErrorCategory::InvalidRequest
            }
            SyncErrorKind::SourceNotFound { .. } => ErrorCategory::SourceNotFound,
            SyncErrorKind::Io { .. }
            | SyncErrorKind::Walk(_)
            | SyncErrorKind::Tool(_)
            | SyncErrorKind::TimedOut { .. }
            | SyncErrorKind::ToolUnavailable { .. } => ErrorCategory::IoFailure,
        }
    }

    /// Returns the path the failure concerns, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.kind {
            SyncErrorKind::SameSourceAndDestination { path }
            | SyncErrorKind::SourceNotFound { path }
            | SyncErrorKind::Io { path, .. } => Some(path),
            SyncErrorKind::Walk(error) => Some(error.path()),
            SyncErrorKind::Tool(_)
            | SyncErrorKind::TimedOut { .. }
            | SyncErrorKind::ToolUnavailable { .. }
            | SyncErrorKind::InvalidExclusion(_) => None,
        }
    }

    /// Reports whether the run was cut short by its deadline, whichever
    /// strategy enforced it.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self.kind,
            SyncErrorKind::TimedOut { .. } | SyncErrorKind::Tool(ProcessError::TimedOut { .. })
        )
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SyncErrorKind::SameSourceAndDestination { path } => {
                write!(
                    f,
                    "source and destination are the same directory '{}'",
                    path.display()
                )
            }
            SyncErrorKind::SourceNotFound { path } => {
                write!(f, "source directory '{}' does not exist", path.display())
            }
            SyncErrorKind::Io {
                action,
                path,
                source,
            } => write!(f, "failed to {action} '{}': {source}", path.display()),
            SyncErrorKind::Walk(error) => write!(f, "{error}"),
            SyncErrorKind::Tool(error) => write!(f, "{error}"),
            SyncErrorKind::TimedOut { limit } => {
                write!(
                    f,
                    "synchronization timed out after {:.3} seconds",
                    limit.as_secs_f64()
                )
            }
            SyncErrorKind::ToolUnavailable { program } => {
                write!(
                    f,
                    "mirroring tool '{}' not found as an executable on PATH",
                    Path::new(program).display()
                )
            }
            SyncErrorKind::InvalidExclusion(error) => write!(f, "{error}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            SyncErrorKind::Io { source, .. } => Some(source),
            SyncErrorKind::Walk(error) => Some(error),
            SyncErrorKind::Tool(error) => Some(error),
            SyncErrorKind::InvalidExclusion(error) => Some(error),
            SyncErrorKind::SameSourceAndDestination { .. }
            | SyncErrorKind::SourceNotFound { .. }
            | SyncErrorKind::TimedOut { .. }
            | SyncErrorKind::ToolUnavailable { .. } => None,
        }
    }
}

impl From<WalkError> for SyncError {
    fn from(error: WalkError) -> Self {
        Self::new(SyncErrorKind::Walk(error))
    }
}

impl From<ProcessError> for SyncError {
    fn from(error: ProcessError) -> Self {
        Self::new(SyncErrorKind::Tool(error))
    }
}

impl From<ExclusionError> for SyncError {
    fn from(error: ExclusionError) -> Self {
        Self::new(SyncErrorKind::InvalidExclusion(error))
    }
}

/// Classification of synchronization failures.
#[derive(Debug)]
pub enum SyncErrorKind {
    /// Source and destination resolve to the same path.
    SameSourceAndDestination {
        /// The shared path.
        path: PathBuf,
    },
    /// The source tree does not exist or is not a directory.
    SourceNotFound {
        /// The missing source.
        path: PathBuf,
    },
    /// Filesystem interaction failed.
    Io {
        /// Action being performed.
        action: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A tree walk failed.
    Walk(WalkError),
    /// The external mirroring tool failed.
    Tool(ProcessError),
    /// The native strategy exceeded its deadline.
    TimedOut {
        /// The configured limit.
        limit: Duration,
    },
    /// The delegated strategy was requested but the tool cannot be found.
    ToolUnavailable {
        /// The program that was searched for.
        program: OsString,
    },
    /// A caller-supplied exclusion pattern does not compile.
    InvalidExclusion(ExclusionError),
}

impl SyncErrorKind {
    /// Returns the action, path, and source error for [`SyncErrorKind::Io`] values.
    #[must_use]
    pub fn as_io(&self) -> Option<(&'static str, &Path, &io::Error)> {
        match self {
            Self::Io {
                action,
                path,
                source,
            } => Some((action, path.as_path(), source)),
            _ => None,
        }
    }
}
