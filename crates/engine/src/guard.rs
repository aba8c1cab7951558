//! Protection against source and destination trees that contain each other.

use std::path::{Path, PathBuf};

use filters::ExclusionSet;
use logging::debug_log;
use paths::AbsolutePath;

/// How the source and destination roots relate on the filesystem.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Nesting {
    /// Neither root contains the other.
    Disjoint,
    /// The destination lives inside the source tree.
    DestinationInSource,
    /// The source lives inside the destination tree.
    SourceInDestination,
}

/// Decides which extra exclusions and skips a run needs so that mirroring
/// never recurses into its own output or deletes its own input.
///
/// The roots are assumed to differ; identical roots are rejected earlier.
#[derive(Clone, Debug)]
pub struct NestedPathGuard {
    source: AbsolutePath,
    destination: AbsolutePath,
    nesting: Nesting,
    self_exclusion: Option<PathBuf>,
}

impl NestedPathGuard {
    /// Classifies the relationship between `source` and `destination`.
    #[must_use]
    pub fn evaluate(source: &AbsolutePath, destination: &AbsolutePath) -> Self {
        let nesting = if destination.is_descendant_of(source) {
            Nesting::DestinationInSource
        } else if source.is_descendant_of(destination) {
            Nesting::SourceInDestination
        } else {
            Nesting::Disjoint
        };

        let self_exclusion = if nesting == Nesting::SourceInDestination {
            source.relative_from(destination)
        } else {
            None
        };

        match (&nesting, &self_exclusion) {
            (Nesting::SourceInDestination, Some(pattern)) => {
                debug_log!(Guard, 1, "source nested in destination, excluding {:?}", pattern);
            }
            (Nesting::DestinationInSource, _) => {
                debug_log!(Guard, 1, "destination nested in source, shielding {:?}", destination.as_path());
            }
            _ => debug_log!(Guard, 2, "source and destination are disjoint"),
        }

        Self {
            source: source.clone(),
            destination: destination.clone(),
            nesting,
            self_exclusion,
        }
    }

    /// The detected relationship.
    #[must_use]
    pub const fn nesting(&self) -> Nesting {
        self.nesting
    }

    /// Destination-relative path of the source, present only when the
    /// source is nested in the destination.
    #[must_use]
    pub fn self_exclusion(&self) -> Option<&Path> {
        self.self_exclusion.as_deref()
    }

    /// Exclusions for the destination deletion pass: the caller's patterns
    /// followed by the self-exclusion, if any. The self-exclusion is literal,
    /// so source directory names are never reinterpreted as patterns.
    #[must_use]
    pub fn deletion_exclusions(&self, caller: &ExclusionSet) -> ExclusionSet {
        let mut effective = caller.clone();
        if let Some(relative) = self.self_exclusion() {
            effective.push_path(relative);
        }
        effective
    }

    /// Reports whether a destination entry must survive the deletion pass.
    ///
    /// With the destination inside the source that is every entry under the
    /// source. With the source inside the destination it is every directory
    /// on the way down to the source, which has no counterpart in the source
    /// yet must not be removed with the source inside it.
    #[must_use]
    pub fn shields(&self, destination_entry: &Path) -> bool {
        match self.nesting {
            Nesting::DestinationInSource => destination_entry.starts_with(self.source.as_path()),
            Nesting::SourceInDestination => self.source.as_path().starts_with(destination_entry),
            Nesting::Disjoint => false,
        }
    }

    /// Absolute path of the subtree the source walk must not descend into.
    #[must_use]
    pub fn pruned_source_subtree(&self) -> Option<&Path> {
        (self.nesting == Nesting::DestinationInSource).then(|| self.destination.as_path())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn guard(source: &str, destination: &str) -> NestedPathGuard {
        NestedPathGuard::evaluate(
            &AbsolutePath::new(source).unwrap(),
            &AbsolutePath::new(destination).unwrap(),
        )
    }

    #[test]
    fn disjoint_roots_need_nothing() {
        let guard = guard("/srv/active", "/srv/staging");
        assert_eq!(guard.nesting(), Nesting::Disjoint);
        assert_eq!(guard.self_exclusion(), None);
        assert_eq!(guard.pruned_source_subtree(), None);
        assert!(!guard.shields(Path::new("/srv/staging/file")));
    }

    #[test]
    fn sibling_with_shared_prefix_is_disjoint() {
        let guard = guard("/one", "/one_two");
        assert_eq!(guard.nesting(), Nesting::Disjoint);
    }

    #[test]
    fn destination_in_source_shields_and_prunes() {
        let guard = guard("/var/source", "/var/source/destination");
        assert_eq!(guard.nesting(), Nesting::DestinationInSource);
        assert_eq!(guard.self_exclusion(), None);
        assert_eq!(
            guard.pruned_source_subtree(),
            Some(Path::new("/var/source/destination"))
        );
        assert!(guard.shields(Path::new("/var/source/destination/stale.txt")));
    }

    #[test]
    fn source_in_destination_excludes_source() {
        let guard = guard("/var/destination/source", "/var/destination");
        assert_eq!(guard.nesting(), Nesting::SourceInDestination);
        assert_eq!(guard.self_exclusion(), Some(Path::new("source")));
        assert_eq!(guard.pruned_source_subtree(), None);
        assert!(guard.shields(Path::new("/var/destination/source")));
        assert!(!guard.shields(Path::new("/var/destination/stale.txt")));
        assert!(!guard.shields(Path::new("/var/destination/sourced")));
    }

    #[test]
    fn deeply_nested_source_yields_multi_segment_exclusion() {
        let guard = guard("/a/b/c", "/a");
        assert_eq!(guard.self_exclusion(), Some(Path::new("b/c")));
        assert!(guard.shields(Path::new("/a/b")));
        assert!(!guard.shields(Path::new("/a/b/other")));
    }

    #[test]
    fn deletion_exclusions_append_after_caller_patterns() {
        let guard = guard("/a/b", "/a");
        let caller = ExclusionSet::normalize(["build", "b"]).unwrap();
        let effective = guard.deletion_exclusions(&caller);
        assert_eq!(effective.patterns().collect::<Vec<_>>(), ["build", "b"]);

        let caller = ExclusionSet::normalize(["build"]).unwrap();
        let effective = guard.deletion_exclusions(&caller);
        assert_eq!(effective.patterns().collect::<Vec<_>>(), ["build", "b"]);
        assert_eq!(caller.len(), 1);
    }

    #[test]
    fn filesystem_root_as_destination() {
        let guard = guard("/source", "/");
        assert_eq!(guard.self_exclusion(), Some(Path::new("source")));
    }

    #[test]
    fn backslash_in_source_name_stays_one_segment() {
        let guard = guard(r"/work/odd
ame/src", "/work");
        let effective = guard.deletion_exclusions(&ExclusionSet::new());
        assert_eq!(effective.patterns().collect::<Vec<_>>(), [r"odd
ame/src"]);
        assert!(effective.matches_path(Path::new(r"odd
ame/src")));
        assert!(!effective.matches_path(Path::new("odd/name/src")));
    }
}
