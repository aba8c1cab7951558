//! crates/paths/src/absolute.rs
//! Absolute, lexically normalized path values.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{self, Component, Path, PathBuf};

use crate::PathError;

/// An absolute, lexically normalized filesystem location.
///
/// The value is resolved exactly once, when it is constructed, against a
/// fixed base. `.` segments are dropped, `..` segments pop the previous
/// segment, and repeated or trailing separators vanish. Two values compare
/// equal iff their normalized forms are equal. Symlinks are not resolved, so
/// no filesystem access is needed beyond reading the working directory in
/// [`from_cwd`](Self::from_cwd).
///
/// ```
/// use paths::AbsolutePath;
///
/// let a = AbsolutePath::resolve("/srv", "app/./src/../").unwrap();
/// let b = AbsolutePath::resolve("/", "srv/app").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_path(), std::path::Path::new("/srv/app"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "PathBuf", into = "PathBuf")
)]
pub struct AbsolutePath {
    inner: PathBuf,
}

impl AbsolutePath {
    /// Resolves `input` against `base`.
    ///
    /// An absolute `input` ignores `base` apart from the absoluteness check.
    pub fn resolve(base: impl AsRef<Path>, input: impl AsRef<Path>) -> Result<Self, PathError> {
        let base = base.as_ref();
        if !base.is_absolute() {
            return Err(PathError::RelativeBase {
                base: base.to_path_buf(),
            });
        }
        Ok(Self {
            inner: normalize_lexically(&base.join(input)),
        })
    }

    /// Resolves `input` against the process working directory.
    pub fn from_cwd(input: impl AsRef<Path>) -> Result<Self, PathError> {
        let cwd = env::current_dir().map_err(|source| PathError::CurrentDir { source })?;
        Self::resolve(cwd, input)
    }

    /// Wraps a path that is already absolute.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, PathError> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(PathError::NotAbsolute {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            inner: normalize_lexically(path),
        })
    }

    /// Borrows the normalized path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.inner
    }

    /// Consumes the value, returning the normalized path.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.inner
    }

    /// Appends a relative path and normalizes the result.
    #[must_use]
    pub fn join_relative(&self, relative: impl AsRef<Path>) -> Self {
        let mut joined = self.inner.clone();
        for component in relative.as_ref().components() {
            match component {
                Component::Normal(name) => joined.push(name),
                Component::ParentDir => {
                    joined.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Self { inner: joined }
    }

    /// Returns the path with exactly one trailing separator.
    #[must_use]
    pub fn with_trailing_separator(&self) -> OsString {
        let mut rendered = self.inner.as_os_str().to_os_string();
        if self.inner.parent().is_some() {
            rendered.push(path::MAIN_SEPARATOR_STR);
        }
        rendered
    }

    /// Reports whether `self` is `ancestor` or nested under it.
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: &Self) -> bool {
        self.inner.starts_with(&ancestor.inner)
    }

    /// Returns `self` relative to `ancestor`, or `None` when it is not nested
    /// under it. Equal values yield an empty path.
    #[must_use]
    pub fn relative_from(&self, ancestor: &Self) -> Option<PathBuf> {
        self.inner
            .strip_prefix(&ancestor.inner)
            .ok()
            .map(Path::to_path_buf)
    }

    /// Convenience wrapper around [`Path::display`].
    #[must_use]
    pub fn display(&self) -> path::Display<'_> {
        self.inner.display()
    }
}

impl AsRef<Path> for AbsolutePath {
    fn as_ref(&self) -> &Path {
        &self.inner
    }
}

impl fmt::Display for AbsolutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.display())
    }
}

impl TryFrom<PathBuf> for AbsolutePath {
    type Error = PathError;

    fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl From<AbsolutePath> for PathBuf {
    fn from(path: AbsolutePath) -> Self {
        path.inner
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                normalized.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping at the root leaves the root in place.
                normalized.pop();
            }
        }
    }
    normalized
}
