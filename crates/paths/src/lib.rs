#![deny(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `paths` answers where one path sits relative to another. It provides the
//! string-level helpers used for exclusion patterns and command lines
//! ([`relative_to`], [`is_descendant_of`], [`normalize_separators`]) and the
//! [`AbsolutePath`] value type the engine uses for source and destination
//! roots.
//!
//! # Invariants
//!
//! - Prefix tests are segment-aware: `/one` is never an ancestor of
//!   `/one_two`.
//! - String helpers treat `\` and `/` as the same separator.
//! - [`AbsolutePath`] values are normalized once, at construction, and never
//!   change afterwards.
//!
//! # Examples
//!
//! ```
//! use paths::{is_descendant_of, relative_to};
//!
//! assert_eq!(relative_to("/a", "/a/b"), "b");
//! assert!(is_descendant_of("/a/b", "/a"));
//! assert!(!is_descendant_of("/ab", "/a"));
//! ```

mod absolute;
mod error;
mod resolver;

pub use absolute::AbsolutePath;
pub use error::PathError;
pub use resolver::{is_descendant_of, normalize_separators, relative_path, relative_to};
