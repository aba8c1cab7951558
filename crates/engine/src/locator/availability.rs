use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use logging::debug_log;

use super::candidates::executable_candidates;
#[cfg(unix)]
use super::unix::can_execute;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct CacheKey {
    program: OsString,
    path: Option<OsString>,
    #[cfg(windows)]
    pathext: Option<OsString>,
}

/// Finds executables and remembers the answer.
///
/// Results are memoized per program and `PATH` value (and `PATHEXT` on
/// Windows), so changing the search path triggers a new search. A cached hit
/// is re-checked before it is returned and searched again when the file has
/// since disappeared. Misses stay cached until [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct ExecutableLocator {
    search_path: Option<OsString>,
    cache: Mutex<HashMap<CacheKey, Option<PathBuf>>>,
}

impl ExecutableLocator {
    /// Creates a locator that reads `PATH` from the environment at lookup
    /// time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a locator that searches `search_path` instead of `PATH`.
    #[must_use]
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
            cache: Mutex::default(),
        }
    }

    /// Returns the first executable candidate for `program`.
    #[must_use]
    pub fn locate(&self, program: &OsStr) -> Option<PathBuf> {
        let key = self.key(program);

        {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            match cache.get(&key) {
                Some(Some(path)) if is_executable(path) => return Some(path.clone()),
                Some(None) => return None,
                Some(Some(_)) => {
                    debug_log!(Exec, 2, "cached {:?} vanished, searching again", program);
                    cache.remove(&key);
                }
                None => {}
            }
        }

        let found = executable_candidates(
            program,
            key.path.as_deref(),
            pathext(&key),
        )
        .into_iter()
        .find(|candidate| is_executable(candidate));
        debug_log!(Exec, 1, "located {:?}: {:?}", program, found);

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, found.clone());
        found
    }

    /// Reports whether `program` can be found and executed.
    #[must_use]
    pub fn is_available(&self, program: &OsStr) -> bool {
        self.locate(program).is_some()
    }

    /// Forgets every cached answer.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn key(&self, program: &OsStr) -> CacheKey {
        CacheKey {
            program: program.to_os_string(),
            path: self.search_path.clone().or_else(|| env::var_os("PATH")),
            #[cfg(windows)]
            pathext: env::var_os("PATHEXT"),
        }
    }
}

#[cfg(windows)]
fn pathext(key: &CacheKey) -> Option<&OsStr> {
    key.pathext.as_deref()
}

#[cfg(not(windows))]
const fn pathext(_key: &CacheKey) -> Option<&OsStr> {
    None
}

fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        can_execute(path)
    }

    #[cfg(not(unix))]
    {
        true
    }
}
