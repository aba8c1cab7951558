use std::fmt;
use std::fs;
use std::io;
use std::time::Duration;

use filters::ExclusionSet;
use paths::AbsolutePath;

use crate::error::SyncError;

/// Callback receiving one line of tool output at a time.
pub type OutputCallback<'a> = dyn FnMut(&str) + 'a;

/// Parameters for a single synchronization run.
///
/// The request lives for exactly one [`SyncEngine::sync`](crate::SyncEngine::sync)
/// call, which consumes it.
pub struct SyncRequest<'a> {
    pub(crate) source: AbsolutePath,
    pub(crate) destination: AbsolutePath,
    pub(crate) exclusions: ExclusionSet,
    pub(crate) on_output: Option<&'a mut OutputCallback<'a>>,
    pub(crate) timeout: Option<Duration>,
}

impl<'a> SyncRequest<'a> {
    /// Creates a request mirroring `source` into `destination` with no
    /// exclusions, no output callback and no timeout.
    #[must_use]
    pub fn new(source: AbsolutePath, destination: AbsolutePath) -> Self {
        Self {
            source,
            destination,
            exclusions: ExclusionSet::new(),
            on_output: None,
            timeout: None,
        }
    }

    /// Sets the caller's exclusion patterns.
    #[must_use]
    pub fn exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Installs a callback that receives the external tool's output line by
    /// line. The native strategy never invokes it.
    #[must_use]
    pub fn on_output(mut self, callback: &'a mut OutputCallback<'a>) -> Self {
        self.on_output = Some(callback);
        self
    }

    /// Bounds the wall-clock duration of the run. A zero duration leaves
    /// the run unbounded.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = bounded(Some(timeout));
        self
    }

    /// Applies `timeout` only when the request has none of its own.
    #[must_use]
    pub const fn timeout_or(mut self, timeout: Option<Duration>) -> Self {
        if self.timeout.is_none() {
            self.timeout = bounded(timeout);
        }
        self
    }

    /// The tree being mirrored.
    #[must_use]
    pub const fn source(&self) -> &AbsolutePath {
        &self.source
    }

    /// The tree being made to look like the source.
    #[must_use]
    pub const fn destination(&self) -> &AbsolutePath {
        &self.destination
    }

    /// The caller's exclusion patterns.
    #[must_use]
    pub const fn exclusion_set(&self) -> &ExclusionSet {
        &self.exclusions
    }

    /// The configured timeout, if any.
    #[must_use]
    pub const fn timeout_limit(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for SyncRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncRequest")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("exclusions", &self.exclusions)
            .field("on_output", &self.on_output.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Maps a zero limit to no limit.
pub(crate) const fn bounded(timeout: Option<Duration>) -> Option<Duration> {
    match timeout {
        Some(limit) if limit.is_zero() => None,
        other => other,
    }
}

/// Rejects requests no strategy may act on. Runs before any mutation.
pub(crate) fn check_preconditions(
    source: &AbsolutePath,
    destination: &AbsolutePath,
) -> Result<(), SyncError> {
    if source == destination {
        return Err(SyncError::same_source_and_destination(
            source.as_path().to_path_buf(),
        ));
    }
    match fs::metadata(source.as_path()) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(SyncError::source_not_found(source.as_path().to_path_buf())),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            Err(SyncError::source_not_found(source.as_path().to_path_buf()))
        }
        Err(error) => Err(SyncError::io(
            "inspect source directory",
            source.as_path().to_path_buf(),
            error,
        )),
    }
}
