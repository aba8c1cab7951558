use thiserror::Error;

/// Error produced when an exclusion pattern cannot be compiled.
#[derive(Debug, Error)]
pub enum ExclusionError {
    /// A pattern containing glob metacharacters is not a valid glob.
    #[error("failed to compile exclusion pattern '{pattern}': {source}")]
    InvalidGlob {
        /// The normalized pattern.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: globset::Error,
    },
}

impl ExclusionError {
    /// Returns the offending pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::InvalidGlob { pattern, .. } => pattern,
        }
    }
}
