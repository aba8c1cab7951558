//! Dependency-free recursive mirroring.
//!
//! A run has two passes over fully materialized walks. The deletion pass
//! removes destination entries that have no counterpart under the source; the
//! copy pass then recreates every source entry under the destination.
//! Destination directories left read-only by an earlier run are made
//! writable first and get their source modes back at the end of the copy.
//! Symlinks are recreated rather than followed, and file and directory times
//! are carried over so a later delegated run sees the tree as up to date.

mod copy;
mod deadline;
mod deletion;
mod writable;

use std::fs;

use logging::{debug_log, info_log};

use crate::error::SyncError;
use crate::guard::NestedPathGuard;
use crate::request::{SyncRequest, check_preconditions};
use crate::SyncEngine;

use deadline::Deadline;

/// [`SyncEngine`] that mirrors trees with plain filesystem calls.
///
/// The output callback of a request is never invoked. A timeout is enforced
/// cooperatively between entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeSyncer;

impl NativeSyncer {
    /// Creates the strategy.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SyncEngine for NativeSyncer {
    fn name(&self) -> &'static str {
        "native"
    }

    fn sync(&self, request: SyncRequest<'_>) -> Result<(), SyncError> {
        let SyncRequest {
            source,
            destination,
            exclusions,
            timeout,
            ..
        } = request;

        check_preconditions(&source, &destination)?;
        let deadline = Deadline::start(timeout);
        let guard = NestedPathGuard::evaluate(&source, &destination);

        fs::create_dir_all(destination.as_path()).map_err(|error| {
            SyncError::io(
                "create destination directory",
                destination.as_path().to_path_buf(),
                error,
            )
        })?;

        debug_log!(
            Cmd,
            1,
            "native sync {:?} -> {:?}",
            source.as_path(),
            destination.as_path()
        );
        let unlocked =
            writable::unlock_directories(&destination, &exclusions, &guard, &deadline)?;
        if unlocked > 0 {
            debug_log!(Del, 1, "made {unlocked} read-only destination directories writable");
        }
        let removed =
            deletion::remove_extraneous(&source, &destination, &exclusions, &guard, &deadline)?;
        let copied = copy::copy_tree(&source, &destination, &exclusions, &guard, &deadline)?;

        info_log!(
            Stats,
            1,
            "{} files, {} directories, {} symlinks copied; {} entries deleted; {} skipped",
            copied.files,
            copied.directories,
            copied.symlinks,
            removed,
            copied.skipped
        );
        Ok(())
    }
}
