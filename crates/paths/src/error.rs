use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error produced when an [`AbsolutePath`](crate::AbsolutePath) cannot be built.
#[derive(Debug, Error)]
pub enum PathError {
    /// The base supplied for resolution was itself relative.
    #[error("resolution base '{}' is not an absolute path", base.display())]
    RelativeBase {
        /// The offending base.
        base: PathBuf,
    },
    /// A value that must already be absolute was relative.
    #[error("path '{}' is not absolute", path.display())]
    NotAbsolute {
        /// The offending path.
        path: PathBuf,
    },
    /// The process working directory could not be read.
    #[error("failed to read the current working directory: {source}")]
    CurrentDir {
        /// Underlying I/O error.
        source: io::Error,
    },
}
