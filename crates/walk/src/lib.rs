#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` provides the deterministic, exclusion-aware traversal both
//! synchronization passes are built on. The walker enumerates regular files,
//! directories and symbolic links beneath a root, sorting directory entries
//! lexicographically before yielding them so the sequence is stable across
//! platforms.
//!
//! # Design
//!
//! - [`WalkBuilder`] configures traversal options: whether the root entry is
//!   emitted, the [`filters::ExclusionSet`] consulted for every entry, and
//!   absolute subtrees to prune.
//! - [`Walker`] implements [`Iterator`] and yields [`WalkEntry`] values in
//!   depth-first order. Directory contents are processed before the walker
//!   moves to the next sibling.
//! - [`WalkError`] describes I/O failures encountered while querying metadata or
//!   reading directories. Errors capture the offending path.
//!
//! # Invariants
//!
//! - Returned [`WalkEntry`] values always reference paths inside the root.
//!   Relative paths never contain `..` segments.
//! - Symlinks are never followed. A link to a directory is a single leaf.
//! - Excluded and pruned entries are not yielded and their contents are never
//!   read.
//! - Traversal never panics; unexpected filesystem failures are reported via
//!   [`WalkError`] and end the iteration.
//!
//! # Errors
//!
//! Traversal emits [`WalkError`] when filesystem metadata cannot be queried or
//! when reading directory contents fails. Callers can downcast to
//! [`std::io::Error`] through [`std::error::Error::source`].
//!
//! # Examples
//!
//! ```
//! use filters::ExclusionSet;
//! use walk::WalkBuilder;
//! use std::fs;
//! use std::path::PathBuf;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path().join("src");
//! fs::create_dir_all(root.join("nested"))?;
//! fs::create_dir_all(root.join("target"))?;
//! fs::write(root.join("file.txt"), b"data")?;
//! fs::write(root.join("nested/more.txt"), b"data")?;
//! fs::write(root.join("target/out.o"), b"data")?;
//!
//! let walker = WalkBuilder::new(&root)
//!     .include_root(false)
//!     .exclusions(ExclusionSet::normalize(["target"])?)
//!     .build()?;
//! let mut paths = Vec::new();
//! for entry in walker {
//!     paths.push(entry?.relative_path().to_path_buf());
//! }
//! assert_eq!(
//!     paths,
//!     [
//!         PathBuf::from("file.txt"),
//!         PathBuf::from("nested"),
//!         PathBuf::from("nested/more.txt"),
//!     ]
//! );
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod entry;
mod error;
mod walker;

pub use builder::WalkBuilder;
pub use entry::{EntryKind, WalkEntry};
pub use error::{WalkError, WalkErrorKind};
pub use walker::Walker;
