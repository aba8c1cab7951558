use crate::entry::WalkEntry;
use crate::error::WalkError;
use filters::ExclusionSet;
use logging::{debug_log, info_log};
use std::ffi::OsString;
use std::fs;
use std::path::{self, Path, PathBuf};

/// Depth-first iterator over filesystem entries.
///
/// Directory contents are sorted before they are yielded, so the order is
/// stable across platforms. Each directory is read when it is first entered.
pub struct Walker {
    pub(crate) root: PathBuf,
    pub(crate) yielded_root: bool,
    pub(crate) root_metadata: Option<fs::Metadata>,
    pub(crate) exclusions: ExclusionSet,
    pub(crate) pruned: Vec<PathBuf>,
    pub(crate) stack: Vec<DirectoryState>,
    pub(crate) skipped: usize,
    pub(crate) finished: bool,
}

impl Walker {
    pub(crate) fn new(
        root: PathBuf,
        include_root: bool,
        exclusions: ExclusionSet,
        pruned: Vec<PathBuf>,
    ) -> Result<Self, WalkError> {
        let root = absolutize(root)?;
        debug_log!(Flist, 1, "walking {:?}", root);

        let metadata = fs::symlink_metadata(&root)
            .map_err(|error| WalkError::root(root.clone(), error))?;

        let mut walker = Self {
            root,
            yielded_root: !include_root,
            root_metadata: Some(metadata),
            exclusions,
            pruned,
            stack: Vec::new(),
            skipped: 0,
            finished: false,
        };

        // A root that is a link to a directory is walked through the link.
        let root_is_dir = match walker.root_metadata.as_ref() {
            Some(metadata) if metadata.file_type().is_symlink() => {
                fs::metadata(&walker.root).is_ok_and(|target| target.is_dir())
            }
            Some(metadata) => metadata.file_type().is_dir(),
            None => false,
        };
        if root_is_dir {
            walker.push_directory(walker.root.clone(), PathBuf::new(), 0)?;
        }

        Ok(walker)
    }

    /// Number of entries skipped so far because they were excluded or pruned.
    ///
    /// Descendants of a skipped directory are never visited and are not
    /// counted.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    fn push_directory(
        &mut self,
        fs_path: PathBuf,
        relative_prefix: PathBuf,
        depth: usize,
    ) -> Result<(), WalkError> {
        debug_log!(Flist, 3, "entering directory: {:?}", fs_path);
        let state = DirectoryState::new(fs_path, relative_prefix, depth)?;
        self.stack.push(state);
        Ok(())
    }

    fn is_skipped(&mut self, full_path: &Path, relative_path: &Path) -> bool {
        if self.exclusions.matches_path(relative_path) {
            debug_log!(Exclude, 2, "excluded {:?}", relative_path);
            info_log!(Skip, 2, "skipping excluded {}", relative_path.display());
            self.skipped += 1;
            return true;
        }
        if self.pruned.iter().any(|pruned| pruned == full_path) {
            debug_log!(Guard, 1, "pruned nested subtree {:?}", full_path);
            info_log!(Skip, 2, "skipping nested {}", relative_path.display());
            self.skipped += 1;
            return true;
        }
        false
    }

    fn prepare_entry(
        &mut self,
        full_path: PathBuf,
        relative_path: PathBuf,
        depth: usize,
    ) -> Result<WalkEntry, WalkError> {
        debug_log!(Flist, 4, "processing entry: {:?}", relative_path);

        let metadata = fs::symlink_metadata(&full_path)
            .map_err(|error| {
            WalkError::inspect_entry(full_path.clone(), relative_path.clone(), error)
        })?;

        if metadata.file_type().is_dir() {
            self.push_directory(full_path.clone(), relative_path.clone(), depth)?;
        }

        Ok(WalkEntry::new(full_path, relative_path, metadata, depth))
    }
}

impl Iterator for Walker {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if !self.yielded_root {
            self.yielded_root = true;
            if let Some(metadata) = self.root_metadata.take() {
                return Some(Ok(WalkEntry::root(self.root.clone(), metadata)));
            }
        }

        loop {
            let (full_path, relative_path, depth) = {
                let state = self.stack.last_mut()?;

                if let Some(name) = state.next_name() {
                    let full_path = state.fs_path.join(&name);
                    let relative_path = if state.relative_prefix.as_os_str().is_empty() {
                        PathBuf::from(&name)
                    } else {
                        let mut rel = state.relative_prefix.clone();
                        rel.push(&name);
                        rel
                    };
                    (full_path, relative_path, state.depth + 1)
                } else {
                    self.stack.pop();
                    continue;
                }
            };

            if self.is_skipped(&full_path, &relative_path) {
                continue;
            }

            match self.prepare_entry(full_path, relative_path, depth) {
                Ok(entry) => return Some(Ok(entry)),
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct DirectoryState {
    fs_path: PathBuf,
    relative_prefix: PathBuf,
    entries: Vec<OsString>,
    index: usize,
    depth: usize,
}

impl DirectoryState {
    fn new(fs_path: PathBuf, relative_prefix: PathBuf, depth: usize) -> Result<Self, WalkError> {
        let mut entries = Vec::new();
        let read_dir = fs::read_dir(&fs_path).map_err(|error| {
            WalkError::list_directory(fs_path.clone(), relative_prefix.clone(), error)
        })?;
        for entry in read_dir {
            let entry = entry.map_err(|error| {
                WalkError::read_entry(fs_path.clone(), relative_prefix.clone(), error)
            })?;
            entries.push(entry.file_name());
        }
        entries.sort();

        debug_log!(Flist, 3, "found {} entries in {:?}", entries.len(), fs_path);

        Ok(Self {
            fs_path,
            relative_prefix,
            entries,
            index: 0,
            depth,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        let name = self.entries.get(self.index).cloned()?;
        self.index += 1;
        Some(name)
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, WalkError> {
    if path.is_absolute() {
        Ok(path)
    } else {
        path::absolute(&path).map_err(|error| WalkError::root(path, error))
    }
}
