#![deny(unsafe_code)]

//! Shared fixtures for tests across the workspace.
//!
//! [`SyncFixture`] lays out a temporary `source` and `destination` pair and
//! [`snapshot`] captures a tree as a sorted map, so a test can assert that
//! two trees mirror each other with a single `assert_eq!`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// One entry captured by [`snapshot`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    /// A directory.
    Dir,
    /// A regular file and its contents.
    File(Vec<u8>),
    /// A symbolic link and its target.
    Symlink(PathBuf),
}

/// Captures every entry below `root` keyed by its `/`-joined relative path.
///
/// The root itself is not included. Symlinks are recorded, never followed.
///
/// # Panics
///
/// Panics when the tree cannot be read.
#[must_use]
pub fn snapshot(root: &Path) -> BTreeMap<String, Node> {
    let mut nodes = BTreeMap::new();
    collect(root, "", &mut nodes).unwrap_or_else(|error| {
        panic!("failed to snapshot {}: {error}", root.display())
    });
    nodes
}

fn collect(dir: &Path, prefix: &str, nodes: &mut BTreeMap<String, Node>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        let path = entry.path();
        let file_type = fs::symlink_metadata(&path)?.file_type();
        if file_type.is_symlink() {
            nodes.insert(relative, Node::Symlink(fs::read_link(&path)?));
        } else if file_type.is_dir() {
            nodes.insert(relative.clone(), Node::Dir);
            collect(&path, &relative, nodes)?;
        } else {
            nodes.insert(relative, Node::File(fs::read(&path)?));
        }
    }
    Ok(())
}

/// Temporary `source` and `destination` directories under one root.
///
/// The destination is not created, so tests can exercise its creation.
#[derive(Debug)]
pub struct SyncFixture {
    root: TempDir,
    source: PathBuf,
    destination: PathBuf,
}

impl SyncFixture {
    /// Creates the fixture with an empty source directory.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap_or_else(|error| panic!("tempdir: {error}"));
        let source = root.path().join("source");
        let destination = root.path().join("destination");
        fs::create_dir(&source).unwrap_or_else(|error| panic!("create source: {error}"));
        Self {
            root,
            source,
            destination,
        }
    }

    /// The temporary root holding both trees.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// The source tree.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The destination tree.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Writes `contents` to `relative` under the source, creating parents.
    pub fn write_source(&self, relative: &str, contents: &[u8]) -> &Self {
        write_file(&self.source, relative, contents);
        self
    }

    /// Writes `contents` to `relative` under the destination, creating
    /// parents and the destination itself.
    pub fn write_destination(&self, relative: &str, contents: &[u8]) -> &Self {
        write_file(&self.destination, relative, contents);
        self
    }

    /// Creates the destination directory.
    pub fn create_destination(&self) -> &Self {
        fs::create_dir_all(&self.destination)
            .unwrap_or_else(|error| panic!("create destination: {error}"));
        self
    }
}

impl Default for SyncFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes a file below `root`, creating parent directories.
///
/// # Panics
///
/// Panics when the file cannot be written.
pub fn write_file(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|error| panic!("create {}: {error}", parent.display()));
    }
    fs::write(&path, contents).unwrap_or_else(|error| panic!("write {}: {error}", path.display()));
}

/// Builds the expected snapshot of a tree holding only the given files and
/// their implied parent directories.
#[must_use]
pub fn files<'a>(entries: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> BTreeMap<String, Node> {
    let mut nodes = BTreeMap::new();
    for (relative, contents) in entries {
        let mut prefix = String::new();
        let segments: Vec<&str> = relative.split('/').collect();
        if let Some((_, parents)) = segments.split_last() {
            for segment in parents {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(segment);
                nodes.insert(prefix.clone(), Node::Dir);
            }
        }
        nodes.insert(relative.to_string(), Node::File(contents.to_vec()));
    }
    nodes
}
