#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` provides [`ExclusionSet`], the ordered list of root-relative
//! paths a synchronization run must neither copy nor delete. The same set is
//! consulted by the native walker and rendered into `--exclude=/PATTERN`
//! arguments for the external mirroring tool, so both strategies skip the
//! same entries.
//!
//! # Invariants
//!
//! - Patterns are separator-normalized to `/` regardless of host platform.
//! - No two entries share a normalized form; first-seen order is kept so the
//!   delegated command line is deterministic.
//! - Matching is anchored at the scanned root. Excluding a directory excludes
//!   its contents only because walkers never descend into matched
//!   directories; descendants are not listed separately.
//!
//! # Errors
//!
//! [`ExclusionSet::normalize`] and [`ExclusionSet::push`] report
//! [`ExclusionError`] when a pattern with glob metacharacters does not
//! compile. The error carries the normalized pattern and the underlying
//! [`globset::Error`].
//!
//! # Examples
//!
//! ```
//! use filters::ExclusionSet;
//!
//! let mut set = ExclusionSet::normalize(["node_modules", r"target\debug"]).unwrap();
//! set.push("b").unwrap();
//!
//! assert!(set.matches("target/debug"));
//! assert_eq!(
//!     set.rooted_patterns().collect::<Vec<_>>(),
//!     ["/node_modules", "/target/debug", "/b"]
//! );
//! ```

mod error;
mod set;

pub use error::ExclusionError;
pub use set::ExclusionSet;
