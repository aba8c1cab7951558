//! Discovery of the external mirroring tool.
//!
//! A bare program name is expanded across the directories of `PATH` (and the
//! `PATHEXT` suffixes on Windows); a name with a directory component is taken
//! as an explicit path. The first candidate that is an executable regular
//! file wins.

mod availability;
mod candidates;
#[cfg(unix)]
mod unix;

pub use availability::ExecutableLocator;
pub use candidates::executable_candidates;
