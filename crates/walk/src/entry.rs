use std::fs;
use std::path::{Path, PathBuf};

/// What a walked entry is, as seen without following links.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// A real directory. The walker descends into it.
    Directory,
    /// A regular file.
    File,
    /// A symbolic link, whatever it points at.
    Symlink,
    /// A device, socket or FIFO.
    Special,
}

impl EntryKind {
    fn of(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Special
        }
    }
}

/// One entry yielded by [`Walker`](crate::Walker).
#[derive(Debug)]
pub struct WalkEntry {
    full_path: PathBuf,
    relative_path: PathBuf,
    metadata: fs::Metadata,
    kind: EntryKind,
    depth: usize,
}

impl WalkEntry {
    pub(crate) fn root(full_path: PathBuf, metadata: fs::Metadata) -> Self {
        Self::new(full_path, PathBuf::new(), metadata, 0)
    }

    pub(crate) fn new(
        full_path: PathBuf,
        relative_path: PathBuf,
        metadata: fs::Metadata,
        depth: usize,
    ) -> Self {
        Self {
            kind: EntryKind::of(metadata.file_type()),
            full_path,
            relative_path,
            metadata,
            depth,
        }
    }

    /// Absolute path of the entry on disk.
    #[must_use]
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Path below the walk root, empty for the root itself.
    ///
    /// This is the path exclusions are matched against and the path both
    /// passes use to find an entry's counterpart in the other tree.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Metadata captured without following links.
    #[must_use]
    pub fn metadata(&self) -> &fs::Metadata {
        &self.metadata
    }

    /// Classification of the entry.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Number of components in [`relative_path`](Self::relative_path).
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Whether this is the walk root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Directories only; a link to a directory is [`EntryKind::Symlink`].
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Whether the entry is a symbolic link.
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// Splits the entry into its absolute and relative paths.
    #[must_use]
    pub fn into_paths(self) -> (PathBuf, PathBuf) {
        (self.full_path, self.relative_path)
    }
}
