use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filters::ExclusionSet;
use logging::{debug_log, info_log};
use paths::AbsolutePath;
use walk::WalkBuilder;

use super::deadline::Deadline;
use crate::error::SyncError;
use crate::guard::NestedPathGuard;

struct Candidate {
    full_path: PathBuf,
    relative_path: PathBuf,
    is_dir: bool,
}

/// Removes destination entries with no counterpart under the source.
///
/// Returns the number of entries removed.
pub(super) fn remove_extraneous(
    source: &AbsolutePath,
    destination: &AbsolutePath,
    exclusions: &ExclusionSet,
    guard: &NestedPathGuard,
    deadline: &Deadline,
) -> Result<usize, SyncError> {
    if is_empty_directory(destination.as_path())? {
        debug_log!(Del, 2, "destination {:?} is empty, skipping deletion pass", destination.as_path());
        return Ok(0);
    }

    let effective = guard.deletion_exclusions(exclusions);
    let walker = WalkBuilder::new(destination.as_path())
        .include_root(false)
        .exclusions(effective)
        .build()?;

    // The whole listing is collected before anything is removed.
    let mut candidates = Vec::new();
    for entry in walker {
        deadline.check()?;
        let entry = entry?;
        if guard.shields(entry.full_path()) {
            debug_log!(Guard, 2, "shielding {:?}", entry.relative_path());
            continue;
        }
        let is_dir = entry.is_dir();
        let (full_path, relative_path) = entry.into_paths();
        candidates.push(Candidate {
            full_path,
            relative_path,
            is_dir,
        });
    }
    debug_log!(Del, 1, "checking {} destination entries", candidates.len());

    let mut removed = 0;
    for candidate in candidates {
        deadline.check()?;
        let counterpart = source.as_path().join(&candidate.relative_path);
        match fs::symlink_metadata(&counterpart) {
            Ok(_) => continue,
            // A file in the source where the destination has a directory.
            Err(error) if is_absent(&error) => {}
            Err(error) => return Err(SyncError::io("inspect source entry", counterpart, error)),
        }

        if remove_entry(candidate.full_path, candidate.is_dir)? {
            info_log!(Del, 1, "deleting {}", candidate.relative_path.display());
            #[cfg(feature = "tracing")]
            logging::trace_del!(path = %candidate.relative_path.display(), "deleted extraneous entry");
            removed += 1;
        }
    }
    Ok(removed)
}

fn is_absent(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn is_empty_directory(path: &Path) -> Result<bool, SyncError> {
    let mut entries = fs::read_dir(path)
        .map_err(|error| SyncError::io("read destination directory", path.to_path_buf(), error))?;
    Ok(entries.next().is_none())
}

/// Returns `Ok(false)` when the entry was already gone, typically because its
/// parent directory was removed first.
fn remove_entry(path: PathBuf, is_dir: bool) -> Result<bool, SyncError> {
    let (action, result) = if is_dir {
        ("remove extraneous directory", fs::remove_dir_all(&path))
    } else {
        ("remove extraneous entry", fs::remove_file(&path))
    };

    match result {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(SyncError::io(action, path, error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn absolute(path: &Path) -> AbsolutePath {
        AbsolutePath::new(path).unwrap()
    }

    #[test]
    fn removes_entries_missing_from_source() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");
        fs::create_dir_all(source.join("keep")).unwrap();
        fs::create_dir_all(destination.join("keep")).unwrap();
        fs::create_dir_all(destination.join("gone/deep")).unwrap();
        fs::write(destination.join("gone/deep/file.txt"), b"x").unwrap();
        fs::write(destination.join("stale.txt"), b"x").unwrap();

        let (source, destination) = (absolute(&source), absolute(&destination));
        let guard = NestedPathGuard::evaluate(&source, &destination);
        let removed = remove_extraneous(
            &source,
            &destination,
            &ExclusionSet::new(),
            &guard,
            &Deadline::start(None),
        )
        .unwrap();

        // `gone` is removed with its children; they are then already gone.
        assert_eq!(removed, 2);
        assert!(destination.as_path().join("keep").is_dir());
        assert!(!destination.as_path().join("gone").exists());
        assert!(!destination.as_path().join("stale.txt").exists());
    }

    #[test]
    fn excluded_entries_survive() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(destination.join("cache")).unwrap();
        fs::write(destination.join("cache/blob"), b"x").unwrap();

        let (source, destination) = (absolute(&source), absolute(&destination));
        let guard = NestedPathGuard::evaluate(&source, &destination);
        let exclusions = ExclusionSet::normalize(["cache"]).unwrap();
        let removed =
            remove_extraneous(&source, &destination, &exclusions, &guard, &Deadline::start(None))
                .unwrap();

        assert_eq!(removed, 0);
        assert!(destination.as_path().join("cache/blob").exists());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_source_link_counts_as_present() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&destination).unwrap();
        std::os::unix::fs::symlink("nowhere", source.join("link")).unwrap();
        fs::write(destination.join("link"), b"x").unwrap();

        let (source, destination) = (absolute(&source), absolute(&destination));
        let guard = NestedPathGuard::evaluate(&source, &destination);
        let removed = remove_extraneous(
            &source,
            &destination,
            &ExclusionSet::new(),
            &guard,
            &Deadline::start(None),
        )
        .unwrap();

        assert_eq!(removed, 0);
        assert!(destination.as_path().join("link").exists());
    }

    #[cfg(unix)]
    #[test]
    fn link_to_directory_is_unlinked_not_followed() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");
        let outside = temp.path().join("outside");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&destination).unwrap();
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("precious"), b"x").unwrap();
        std::os::unix::fs::symlink(&outside, destination.join("link")).unwrap();

        let (source, destination) = (absolute(&source), absolute(&destination));
        let guard = NestedPathGuard::evaluate(&source, &destination);
        remove_extraneous(
            &source,
            &destination,
            &ExclusionSet::new(),
            &guard,
            &Deadline::start(None),
        )
        .unwrap();

        assert!(fs::symlink_metadata(destination.as_path().join("link")).is_err());
        assert!(outside.join("precious").exists());
    }

    #[test]
    fn children_of_a_directory_replaced_by_a_file_are_removed() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("x"), b"file now").unwrap();
        fs::create_dir_all(destination.join("x/nested")).unwrap();
        fs::write(destination.join("x/child"), b"old").unwrap();

        let (source, destination) = (absolute(&source), absolute(&destination));
        let guard = NestedPathGuard::evaluate(&source, &destination);
        let removed = remove_extraneous(
            &source,
            &destination,
            &ExclusionSet::new(),
            &guard,
            &Deadline::start(None),
        )
        .unwrap();

        assert_eq!(removed, 2);
        assert!(destination.as_path().join("x").is_dir());
        assert!(!destination.as_path().join("x/child").exists());
    }

    #[test]
    fn expired_deadline_aborts() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&destination).unwrap();
        fs::write(destination.join("stale.txt"), b"x").unwrap();

        let (source, destination) = (absolute(&source), absolute(&destination));
        let guard = NestedPathGuard::evaluate(&source, &destination);
        let elapsed = Deadline::start(Some(Duration::from_nanos(1)));
        std::thread::sleep(Duration::from_millis(2));
        let error = remove_extraneous(
            &source,
            &destination,
            &ExclusionSet::new(),
            &guard,
            &elapsed,
        )
        .unwrap_err();

        assert!(error.is_timeout());
        assert!(destination.as_path().join("stale.txt").exists());
    }
}
