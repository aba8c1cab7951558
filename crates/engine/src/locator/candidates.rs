use std::collections::HashSet;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

#[cfg(windows)]
use std::os::windows::ffi::{OsStrExt, OsStringExt};

/// Returns the paths at which `program` may be found, in search order.
///
/// `search_path` takes the place of `PATH`; `None` yields no candidates for a
/// bare name. `pathext` is only consulted on Windows. Duplicate directories
/// produce a single candidate and an empty `PATH` entry means the current
/// directory.
#[must_use]
pub fn executable_candidates(
    program: &OsStr,
    search_path: Option<&OsStr>,
    pathext: Option<&OsStr>,
) -> Vec<PathBuf> {
    let direct = Path::new(program);
    let extensions = extensions_for(direct, pathext);

    if has_explicit_path(direct) {
        return explicit_candidates(direct, &extensions);
    }

    let Some(search_path) = search_path else {
        return Vec::new();
    };

    let mut results = Vec::new();
    let mut seen = HashSet::new();
    for dir in env::split_paths(search_path) {
        let base = if dir.as_os_str().is_empty() {
            direct.to_path_buf()
        } else {
            dir.join(direct)
        };
        for extension in &extensions {
            if let Some(candidate) = apply_extension(&base, extension) {
                if seen.insert(candidate.clone()) {
                    results.push(candidate);
                }
            }
        }
    }
    results
}

fn has_explicit_path(path: &Path) -> bool {
    path.is_absolute() || path.components().count() > 1
}

#[cfg(not(windows))]
fn explicit_candidates(path: &Path, _extensions: &[OsString]) -> Vec<PathBuf> {
    vec![path.to_path_buf()]
}

#[cfg(windows)]
fn explicit_candidates(path: &Path, extensions: &[OsString]) -> Vec<PathBuf> {
    let mut results = vec![path.to_path_buf()];
    for extension in extensions {
        if let Some(candidate) = apply_extension(path, extension) {
            if !results.contains(&candidate) {
                results.push(candidate);
            }
        }
    }
    results
}

fn apply_extension(base: &Path, extension: &OsStr) -> Option<PathBuf> {
    if extension.is_empty() {
        return Some(base.to_path_buf());
    }
    let text = extension.to_string_lossy();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut candidate = base.to_path_buf();
    candidate.set_extension(trimmed.strip_prefix('.').unwrap_or(trimmed));
    Some(candidate)
}

#[cfg(not(windows))]
fn extensions_for(_program: &Path, _pathext: Option<&OsStr>) -> Vec<OsString> {
    vec![OsString::new()]
}

/// The program's own extension first, then `PATHEXT` entries, compared
/// case-insensitively. Falls back to the executable suffixes `cmd.exe` uses.
#[cfg(windows)]
fn extensions_for(program: &Path, pathext: Option<&OsStr>) -> Vec<OsString> {
    let mut extensions = Vec::new();
    let mut seen = HashSet::new();

    if let Some(own) = program.extension() {
        let mut dotted = OsString::from(".");
        dotted.push(own);
        push_extension(&dotted.encode_wide().collect::<Vec<_>>(), &mut extensions, &mut seen);
    }
    if let Some(pathext) = pathext {
        let units: Vec<u16> = pathext.encode_wide().collect();
        for segment in units.split(|unit| *unit == u16::from(b';')) {
            push_extension(segment, &mut extensions, &mut seen);
        }
    }
    if extensions.is_empty() {
        for default in [".exe", ".com", ".bat", ".cmd"] {
            let units: Vec<u16> = default.encode_utf16().collect();
            push_extension(&units, &mut extensions, &mut seen);
        }
    }
    extensions
}

#[cfg(windows)]
fn push_extension(segment: &[u16], extensions: &mut Vec<OsString>, seen: &mut HashSet<Vec<u16>>) {
    let is_space = |unit: &u16| matches!(*unit, 0x20 | 0x09 | 0x0a | 0x0d);
    let start = segment.iter().position(|unit| !is_space(unit));
    let end = segment.iter().rposition(|unit| !is_space(unit));
    let (Some(start), Some(end)) = (start, end) else {
        return;
    };
    let trimmed = &segment[start..=end];
    let folded: Vec<u16> = trimmed
        .iter()
        .map(|unit| match u8::try_from(*unit) {
            Ok(byte) => u16::from(byte.to_ascii_uppercase()),
            Err(_) => *unit,
        })
        .collect();
    if seen.insert(folded) {
        extensions.push(OsString::from_wide(trimmed));
    }
}
