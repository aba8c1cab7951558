//! Mirroring through an external `rsync` executable.

mod command;

use std::ffi::{OsStr, OsString};
use std::fs;

use logging::debug_log;

use crate::SyncEngine;
use crate::error::SyncError;
use crate::guard::NestedPathGuard;
use crate::process::{ProcessRunner, SystemProcessRunner};
use crate::request::{SyncRequest, check_preconditions};

pub use command::{BASE_FLAGS, build_arguments};

/// [`SyncEngine`] that hands the whole tree to an external mirroring tool.
///
/// Each stdout line of the tool goes to the request's output callback. Tool
/// failures carry the tool's stderr.
#[derive(Clone, Debug)]
pub struct DelegatedSyncer<R = SystemProcessRunner> {
    program: OsString,
    runner: R,
}

impl DelegatedSyncer {
    /// Creates the strategy for `program`, a name looked up on `PATH` or an
    /// explicit path.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self::with_runner(program, SystemProcessRunner::new())
    }
}

impl<R: ProcessRunner> DelegatedSyncer<R> {
    /// Creates the strategy with a custom process runner.
    #[must_use]
    pub fn with_runner(program: impl Into<OsString>, runner: R) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// The program the strategy invokes.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }
}

impl<R: ProcessRunner> SyncEngine for DelegatedSyncer<R> {
    fn name(&self) -> &'static str {
        "delegated"
    }

    fn sync(&self, request: SyncRequest<'_>) -> Result<(), SyncError> {
        let SyncRequest {
            source,
            destination,
            exclusions,
            on_output,
            timeout,
        } = request;

        check_preconditions(&source, &destination)?;
        let guard = NestedPathGuard::evaluate(&source, &destination);
        // The tool takes a single exclusion list for both sides of the run.
        let effective = guard.deletion_exclusions(&exclusions);

        fs::create_dir_all(destination.as_path()).map_err(|error| {
            SyncError::io(
                "create destination directory",
                destination.as_path().to_path_buf(),
                error,
            )
        })?;

        let args = build_arguments(&source, &destination, &effective);
        debug_log!(Cmd, 1, "{:?} {:?}", self.program, args);
        #[cfg(feature = "tracing")]
        logging::trace_cmd!(program = ?self.program, args = ?args, "invoking mirroring tool");

        self.runner.run(&self.program, &args, on_output, timeout)?;
        Ok(())
    }
}
