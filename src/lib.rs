#![deny(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `stage_sync` mirrors an "active" directory tree into a parallel "staging"
//! tree and back. This crate re-exports the workspace's public API:
//!
//! - [`paths`] resolves and relates absolute paths;
//! - [`filters`] holds the exclusion patterns a run must not touch;
//! - [`walk`] is the deterministic tree walker;
//! - [`engine`] provides the [`SyncEngine`] strategies and their selection;
//! - [`logging`] controls diagnostic verbosity.
//!
//! # Examples
//!
//! ```
//! use stage_sync::{AbsolutePath, EngineConfig, ExclusionSet, Strategy, StrategySelector, SyncRequest};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::create_dir_all(temp.path().join("active/src"))?;
//! fs::write(temp.path().join("active/src/lib.rs"), b"")?;
//!
//! let selector = StrategySelector::new(EngineConfig::new().with_strategy(Strategy::Native));
//! selector.sync(
//!     SyncRequest::new(
//!         AbsolutePath::resolve(temp.path(), "active")?,
//!         AbsolutePath::resolve(temp.path(), "staging")?,
//!     )
//!     .exclusions(ExclusionSet::normalize(["target"])?),
//! )?;
//!
//! assert!(temp.path().join("staging/src/lib.rs").exists());
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

pub use engine;
pub use filters;
pub use logging;
pub use paths;
pub use walk;

pub use engine::{
    DelegatedSyncer, EngineConfig, ErrorCategory, ExecutableLocator, NativeSyncer,
    NestedPathGuard, Strategy, StrategySelector, SyncEngine, SyncError, SyncErrorKind,
    SyncRequest, sync,
};
pub use filters::ExclusionSet;
pub use paths::AbsolutePath;
