#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` makes one directory tree an exclusion-aware, idempotent mirror of
//! another. Two strategies implement the [`SyncEngine`] contract:
//!
//! - [`NativeSyncer`] walks both trees with the `walk` crate and copies with
//!   plain filesystem calls;
//! - [`DelegatedSyncer`] hands the tree to an external `rsync` executable.
//!
//! [`StrategySelector`] picks one per run: the delegated strategy when the
//! tool can be located, the native one otherwise, unless [`EngineConfig`]
//! forces a choice.
//!
//! # Design
//!
//! Both strategies check the same preconditions and consult the same
//! [`NestedPathGuard`] before touching the filesystem, so a source nested in
//! its destination is never deleted and a destination nested in its source is
//! never copied into itself. Caller exclusions are always honored; the guard
//! only ever appends to a copy of them.
//!
//! # Errors
//!
//! Every failure is a [`SyncError`]. [`SyncError::category`] separates
//! unusable requests, a missing source and I/O failures (including the
//! external tool failing or timing out). Messages name what failed; turning
//! them into prose for people is left to the caller.
//!
//! # Examples
//!
//! ```
//! use engine::{NativeSyncer, SyncEngine, SyncRequest};
//! use filters::ExclusionSet;
//! use paths::AbsolutePath;
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let active = temp.path().join("active");
//! fs::create_dir_all(active.join("node_modules"))?;
//! fs::write(active.join("main.rs"), b"fn main() {}")?;
//!
//! let request = SyncRequest::new(
//!     AbsolutePath::new(&active)?,
//!     AbsolutePath::new(temp.path().join("staging"))?,
//! )
//! .exclusions(ExclusionSet::normalize(["node_modules"])?);
//! NativeSyncer::new().sync(request)?;
//!
//! assert!(temp.path().join("staging/main.rs").exists());
//! assert!(!temp.path().join("staging/node_modules").exists());
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

use std::time::Duration;

use filters::ExclusionSet;
use paths::AbsolutePath;

pub mod config;
pub mod delegated;
mod error;
pub mod guard;
pub mod locator;
pub mod native;
pub mod process;
mod request;
mod select;

pub use config::{ConfigError, EngineConfig, Strategy};
pub use delegated::DelegatedSyncer;
pub use error::{ErrorCategory, SyncError, SyncErrorKind};
pub use guard::{NestedPathGuard, Nesting};
pub use locator::ExecutableLocator;
pub use native::NativeSyncer;
pub use process::{ProcessError, ProcessRunner, SystemProcessRunner};
pub use request::{OutputCallback, SyncRequest};
pub use select::StrategySelector;

/// A way of mirroring one directory tree into another.
///
/// After a successful [`sync`](Self::sync) the destination holds exactly the
/// source's non-excluded entries, excluded destination entries are untouched,
/// and running it again with an unchanged source changes nothing.
pub trait SyncEngine {
    /// Short, stable name of the strategy.
    fn name(&self) -> &'static str;

    /// Mirrors `request.source()` into `request.destination()`.
    fn sync(&self, request: SyncRequest<'_>) -> Result<(), SyncError>;
}

impl<E: SyncEngine + ?Sized> SyncEngine for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn sync(&self, request: SyncRequest<'_>) -> Result<(), SyncError> {
        (**self).sync(request)
    }
}

/// Runs one synchronization with `engine` without building a
/// [`SyncRequest`] by hand.
pub fn sync<'a>(
    engine: &dyn SyncEngine,
    source: AbsolutePath,
    destination: AbsolutePath,
    exclusions: ExclusionSet,
    on_output: Option<&'a mut OutputCallback<'a>>,
    timeout: Option<Duration>,
) -> Result<(), SyncError> {
    let mut request = SyncRequest::new(source, destination)
        .exclusions(exclusions)
        .timeout_or(timeout);
    if let Some(callback) = on_output {
        request = request.on_output(callback);
    }
    engine.sync(request)
}
