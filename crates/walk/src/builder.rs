use crate::error::WalkError;
use crate::walker::Walker;
use filters::ExclusionSet;
use std::path::PathBuf;

/// Configures a filesystem traversal rooted at a specific path.
///
/// Symlinks below the root are never followed: a link, including a link to a
/// directory, is yielded as a single leaf entry. A root that is itself a link
/// to a directory is walked through the link. Entries matched by the configured
/// [`ExclusionSet`] and entries whose absolute path was registered with
/// [`prune`](Self::prune) are skipped together with everything beneath them.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    include_root: bool,
    exclusions: ExclusionSet,
    pruned: Vec<PathBuf>,
}

impl WalkBuilder {
    /// Creates a new builder that will traverse the provided root path.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            include_root: true,
            exclusions: ExclusionSet::new(),
            pruned: Vec::new(),
        }
    }

    /// Controls whether the root entry should be included in the output.
    ///
    /// When disabled, traversal starts directly with the root's children.
    #[must_use]
    pub const fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Skips entries whose root-relative path matches `exclusions`.
    ///
    /// Matched directories are not descended into.
    #[must_use]
    pub fn exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Skips the entry at the absolute path `subtree` and everything beneath
    /// it. Paths outside the traversal root have no effect.
    #[must_use]
    pub fn prune<P: Into<PathBuf>>(mut self, subtree: P) -> Self {
        self.pruned.push(subtree.into());
        self
    }

    /// Builds a [`Walker`] using the configured options.
    pub fn build(self) -> Result<Walker, WalkError> {
        Walker::new(self.root, self.include_root, self.exclusions, self.pruned)
    }
}
