use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::{FileTime, set_file_times, set_symlink_file_times};
use filters::ExclusionSet;
use logging::{debug_log, info_log};
use paths::AbsolutePath;
use walk::{EntryKind, WalkBuilder, WalkEntry};

use super::deadline::Deadline;
use crate::error::SyncError;
use crate::guard::NestedPathGuard;

/// Totals for one copy pass.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) struct CopySummary {
    pub(super) directories: usize,
    pub(super) files: usize,
    pub(super) symlinks: usize,
    pub(super) skipped: usize,
}

/// Directory whose permissions and times are applied once its contents are
/// in place.
struct PendingDirectory {
    path: PathBuf,
    depth: usize,
    metadata: fs::Metadata,
}

/// Copies every non-excluded source entry into the destination.
pub(super) fn copy_tree(
    source: &AbsolutePath,
    destination: &AbsolutePath,
    exclusions: &ExclusionSet,
    guard: &NestedPathGuard,
    deadline: &Deadline,
) -> Result<CopySummary, SyncError> {
    let mut builder = WalkBuilder::new(source.as_path()).exclusions(exclusions.clone());
    if let Some(nested) = guard.pruned_source_subtree() {
        builder = builder.prune(nested);
    }
    let walker = builder.build()?;

    // Materialize first: the copy itself must not be observed by the walk.
    let mut entries = Vec::new();
    for entry in walker {
        deadline.check()?;
        entries.push(entry?);
    }
    debug_log!(Flist, 1, "copying {} source entries", entries.len());

    let mut summary = CopySummary::default();
    let mut directories = Vec::new();
    for entry in entries {
        deadline.check()?;
        let target = destination.as_path().join(entry.relative_path());

        if entry.is_root() {
            // The destination root already exists; only its metadata follows.
            directories.push(PendingDirectory {
                path: target,
                depth: 0,
                metadata: root_metadata(&entry)?,
            });
            continue;
        }
        match entry.kind() {
            EntryKind::Directory => {
                ensure_directory(&target)?;
                summary.directories += 1;
                directories.push(PendingDirectory {
                    path: target,
                    depth: entry.depth(),
                    metadata: entry.metadata().clone(),
                });
            }
            EntryKind::Symlink => {
                copy_symlink(&entry, &target)?;
                summary.symlinks += 1;
            }
            EntryKind::File => {
                copy_file(&entry, &target)?;
                info_log!(Copy, 1, "{}", entry.relative_path().display());
                #[cfg(feature = "tracing")]
                logging::trace_copy!(path = %entry.relative_path().display(), "copied file");
                summary.files += 1;
            }
            EntryKind::Special => {
                info_log!(Nonreg, 1, "skipping non-regular file \"{}\"", entry.relative_path().display());
                summary.skipped += 1;
            }
        }
    }

    // Writing children bumps a directory's mtime, so parents go last.
    directories.sort_by_key(|directory| Reverse(directory.depth));
    for directory in directories {
        deadline.check()?;
        apply_directory_metadata(&directory)?;
    }

    Ok(summary)
}

fn root_metadata(entry: &WalkEntry) -> Result<fs::Metadata, SyncError> {
    if entry.is_symlink() {
        // A linked root is copied through the link.
        fs::metadata(entry.full_path()).map_err(|error| {
            SyncError::io("inspect source directory", entry.full_path().to_path_buf(), error)
        })
    } else {
        Ok(entry.metadata().clone())
    }
}

fn ensure_directory(target: &Path) -> Result<(), SyncError> {
    match fs::symlink_metadata(target) {
        Ok(existing) if existing.is_dir() => return Ok(()),
        Ok(_) => {
            debug_log!(Del, 2, "replacing non-directory {:?}", target);
            fs::remove_file(target).map_err(|error| {
                SyncError::io("remove conflicting entry", target.to_path_buf(), error)
            })?;
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(SyncError::io(
                "inspect destination entry",
                target.to_path_buf(),
                error,
            ));
        }
    }
    fs::create_dir(target)
        .map_err(|error| SyncError::io("create directory", target.to_path_buf(), error))
}

/// Removes whatever occupies `target` unless it is a writable regular file.
fn clear_for_file(target: &Path) -> Result<(), SyncError> {
    match fs::symlink_metadata(target) {
        Ok(existing) if existing.is_file() && !existing.permissions().readonly() => Ok(()),
        Ok(existing) => remove_existing(target, existing.is_dir()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(SyncError::io(
            "inspect destination entry",
            target.to_path_buf(),
            error,
        )),
    }
}

fn remove_existing(target: &Path, is_dir: bool) -> Result<(), SyncError> {
    debug_log!(Del, 2, "replacing {:?}", target);
    let result = if is_dir {
        fs::remove_dir_all(target)
    } else {
        fs::remove_file(target)
    };
    result.map_err(|error| SyncError::io("remove conflicting entry", target.to_path_buf(), error))
}

fn copy_file(entry: &WalkEntry, target: &Path) -> Result<(), SyncError> {
    clear_for_file(target)?;
    fs::copy(entry.full_path(), target)
        .map_err(|error| SyncError::io("copy file", target.to_path_buf(), error))?;

    let metadata = entry.metadata();
    set_file_times(
        target,
        FileTime::from_last_access_time(metadata),
        FileTime::from_last_modification_time(metadata),
    )
    .map_err(|error| SyncError::io("preserve timestamps", target.to_path_buf(), error))
}

fn copy_symlink(entry: &WalkEntry, target: &Path) -> Result<(), SyncError> {
    let link_target = fs::read_link(entry.full_path()).map_err(|error| {
        SyncError::io("read symbolic link", entry.full_path().to_path_buf(), error)
    })?;

    match fs::symlink_metadata(target) {
        Ok(existing) if existing.file_type().is_symlink() => {
            if fs::read_link(target).is_ok_and(|current| current == link_target) {
                debug_log!(Flist, 3, "symlink {:?} is up to date", target);
                return preserve_symlink_times(entry, target);
            }
            remove_existing(target, false)?;
        }
        Ok(existing) => remove_existing(target, existing.is_dir())?,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(SyncError::io(
                "inspect destination entry",
                target.to_path_buf(),
                error,
            ));
        }
    }

    create_symlink(&link_target, entry.full_path(), target)
        .map_err(|error| SyncError::io("create symbolic link", target.to_path_buf(), error))?;
    info_log!(Copy, 1, "{} -> {}", entry.relative_path().display(), link_target.display());
    preserve_symlink_times(entry, target)
}

fn preserve_symlink_times(entry: &WalkEntry, target: &Path) -> Result<(), SyncError> {
    let metadata = entry.metadata();
    set_symlink_file_times(
        target,
        FileTime::from_last_access_time(metadata),
        FileTime::from_last_modification_time(metadata),
    )
    .map_err(|error| SyncError::io("preserve timestamps", target.to_path_buf(), error))
}

fn apply_directory_metadata(directory: &PendingDirectory) -> Result<(), SyncError> {
    let path = directory.path.as_path();
    fs::set_permissions(path, directory.metadata.permissions())
        .map_err(|error| SyncError::io("preserve permissions", path.to_path_buf(), error))?;
    set_file_times(
        path,
        FileTime::from_last_access_time(&directory.metadata),
        FileTime::from_last_modification_time(&directory.metadata),
    )
    .map_err(|error| SyncError::io("preserve timestamps", path.to_path_buf(), error))
}

#[cfg(unix)]
fn create_symlink(link_target: &Path, _source: &Path, destination: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(link_target, destination)
}

#[cfg(windows)]
fn create_symlink(link_target: &Path, source: &Path, destination: &Path) -> io::Result<()> {
    use std::os::windows::fs::{symlink_dir, symlink_file};

    match source.metadata() {
        Ok(metadata) if metadata.file_type().is_dir() => symlink_dir(link_target, destination),
        Ok(_) | Err(_) => symlink_file(link_target, destination),
    }
}
