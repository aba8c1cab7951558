use filters::ExclusionSet;
use paths::AbsolutePath;

use super::deadline::Deadline;
use crate::error::SyncError;
use crate::guard::NestedPathGuard;

/// Grants the owner write access to every destination directory the run may
/// modify.
///
/// A previous run copies source directory modes, so a read-only source
/// directory leaves a destination directory nothing can be created in or
/// removed from. The copy pass restores the source modes once the contents
/// are in place. Excluded subtrees and a source nested in the destination are
/// not visited.
///
/// Returns the number of directories whose mode changed.
#[cfg(unix)]
pub(super) fn unlock_directories(
    destination: &AbsolutePath,
    exclusions: &ExclusionSet,
    guard: &NestedPathGuard,
    deadline: &Deadline,
) -> Result<usize, SyncError> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use logging::debug_log;
    use walk::WalkBuilder;

    const OWNER_WRITE: u32 = 0o200;

    let walker = WalkBuilder::new(destination.as_path())
        .exclusions(guard.deletion_exclusions(exclusions))
        .build()?;

    let mut unlocked = 0;
    for entry in walker {
        deadline.check()?;
        let entry = entry?;
        if !entry.is_dir() {
            continue;
        }
        let mode = entry.metadata().permissions().mode();
        if mode & OWNER_WRITE != 0 {
            continue;
        }
        let path = entry.full_path();
        fs::set_permissions(path, fs::Permissions::from_mode(mode | OWNER_WRITE)).map_err(
            |error| SyncError::io("make directory writable", path.to_path_buf(), error),
        )?;
        debug_log!(Del, 2, "made {:?} writable for this run", path);
        unlocked += 1;
    }
    Ok(unlocked)
}

/// Directory permissions do not restrict entry creation on this platform.
#[cfg(not(unix))]
pub(super) fn unlock_directories(
    _destination: &AbsolutePath,
    _exclusions: &ExclusionSet,
    _guard: &NestedPathGuard,
    _deadline: &Deadline,
) -> Result<usize, SyncError> {
    Ok(0)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn absolute(path: &Path) -> AbsolutePath {
        AbsolutePath::new(path).unwrap()
    }

    fn mode(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn read_only_directories_gain_owner_write() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(destination.join("locked/inner")).unwrap();
        fs::create_dir_all(destination.join("cache")).unwrap();
        fs::set_permissions(destination.join("cache"), fs::Permissions::from_mode(0o555)).unwrap();
        fs::set_permissions(destination.join("locked/inner"), fs::Permissions::from_mode(0o555))
            .unwrap();
        fs::set_permissions(destination.join("locked"), fs::Permissions::from_mode(0o555)).unwrap();

        let (source_path, destination_path) = (absolute(&source), absolute(&destination));
        let guard = NestedPathGuard::evaluate(&source_path, &destination_path);
        let exclusions = ExclusionSet::normalize(["cache"]).unwrap();
        let unlocked =
            unlock_directories(&destination_path, &exclusions, &guard, &Deadline::start(None))
                .unwrap();

        assert_eq!(unlocked, 2);
        assert_eq!(mode(&destination.join("locked")), 0o755);
        assert_eq!(mode(&destination.join("locked/inner")), 0o755);
        assert_eq!(mode(&destination.join("cache")), 0o555);

        fs::set_permissions(destination.join("cache"), fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn nested_source_is_left_alone() {
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("dst");
        let source = destination.join("src");
        fs::create_dir_all(&source).unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o555)).unwrap();

        let (source_path, destination_path) = (absolute(&source), absolute(&destination));
        let guard = NestedPathGuard::evaluate(&source_path, &destination_path);
        let unlocked = unlock_directories(
            &destination_path,
            &ExclusionSet::new(),
            &guard,
            &Deadline::start(None),
        )
        .unwrap();

        assert_eq!(unlocked, 0);
        assert_eq!(mode(&source), 0o555);

        fs::set_permissions(&source, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
