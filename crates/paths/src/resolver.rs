//! crates/paths/src/resolver.rs
//! String-level ancestor/descendant helpers.
//!
//! These helpers operate on separator-normalized strings so that Windows and
//! Unix style inputs compare equivalently. Prefix tests are segment-aware:
//! `/one` is never treated as an ancestor of `/one_two`.

use std::path::{Path, PathBuf};

const SEPARATOR: char = '/';

/// Rewrites every `\` in `path` to `/`.
#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Returns `candidate` expressed relative to `ancestor`.
///
/// Equal inputs (ignoring trailing separators) yield the empty string, and
/// so does `relative_to("", "")`. When `candidate` is not `ancestor` or
/// nested under it, `candidate` is returned unchanged. Otherwise the ancestor
/// prefix and exactly one separator are stripped.
///
/// ```
/// use paths::relative_to;
///
/// assert_eq!(relative_to("/one", "/one/two/three.txt"), "two/three.txt");
/// assert_eq!(relative_to("/one", "/one_two"), "/one_two");
/// assert_eq!(relative_to(r"C:\work", r"C:\work\src"), "src");
/// ```
#[must_use]
pub fn relative_to(ancestor: &str, candidate: &str) -> String {
    let ancestor_normalized = normalize_separators(ancestor);
    let candidate_normalized = normalize_separators(candidate);
    let ancestor_trimmed = trim_trailing_separators(&ancestor_normalized);
    let candidate_trimmed = trim_trailing_separators(&candidate_normalized);

    if ancestor_trimmed == candidate_trimmed {
        return String::new();
    }
    if ancestor_trimmed.is_empty() {
        return candidate.to_owned();
    }

    match strip_segment_prefix(ancestor_trimmed, candidate_trimmed) {
        Some(rest) => rest.to_owned(),
        None => candidate.to_owned(),
    }
}

/// Reports whether `candidate` is `ancestor` itself or nested under it.
#[must_use]
pub fn is_descendant_of(candidate: &str, ancestor: &str) -> bool {
    let ancestor_normalized = normalize_separators(ancestor);
    let candidate_normalized = normalize_separators(candidate);
    let ancestor_trimmed = trim_trailing_separators(&ancestor_normalized);
    let candidate_trimmed = trim_trailing_separators(&candidate_normalized);

    if ancestor_trimmed == candidate_trimmed {
        return true;
    }
    if ancestor_trimmed.is_empty() {
        return false;
    }
    strip_segment_prefix(ancestor_trimmed, candidate_trimmed).is_some()
}

/// Component-wise counterpart of [`relative_to`] for real filesystem paths.
///
/// No separator rewriting takes place, so names that legally contain `\` on
/// Unix survive intact. Returns `candidate` unchanged when it is not under
/// `ancestor`, and an empty path when the two are equal.
#[must_use]
pub fn relative_path(ancestor: &Path, candidate: &Path) -> PathBuf {
    match candidate.strip_prefix(ancestor) {
        Ok(rest) => rest.to_path_buf(),
        Err(_) => candidate.to_path_buf(),
    }
}

fn trim_trailing_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() && !path.is_empty() {
        // The filesystem root survives trimming.
        &path[..1]
    } else {
        trimmed
    }
}

fn strip_segment_prefix<'a>(ancestor: &str, candidate: &'a str) -> Option<&'a str> {
    let rest = candidate.strip_prefix(ancestor)?;
    if ancestor.ends_with(SEPARATOR) {
        return Some(rest);
    }
    rest.strip_prefix(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_are_identity() {
        assert_eq!(relative_to("", ""), "");
    }

    #[test]
    fn equal_paths_yield_empty_string() {
        assert_eq!(relative_to("/one/two", "/one/two"), "");
        assert_eq!(relative_to("/one/two/", "/one/two"), "");
        assert_eq!(relative_to("/one/two", "/one/two//"), "");
    }

    #[test]
    fn strips_ancestor_and_one_separator() {
        assert_eq!(relative_to("/one", "/one/two"), "two");
        assert_eq!(relative_to("/one/", "/one/two/three.txt"), "two/three.txt");
    }

    #[test]
    fn naive_string_prefix_is_not_an_ancestor() {
        assert_eq!(relative_to("/one", "/one_two"), "/one_two");
        assert_eq!(relative_to("/one", "/one_two/file"), "/one_two/file");
        assert!(!is_descendant_of("/one_two", "/one"));
    }

    #[test]
    fn unrelated_candidate_is_returned_unchanged() {
        assert_eq!(relative_to("/one", "/two/three"), "/two/three");
        assert_eq!(relative_to("/one", r"\two\three"), r"\two\three");
        assert_eq!(relative_to("", "/two"), "/two");
    }

    #[test]
    fn root_is_a_valid_ancestor() {
        assert_eq!(relative_to("/", "/etc/hosts"), "etc/hosts");
        assert_eq!(relative_to("/", "/"), "");
        assert!(is_descendant_of("/etc", "/"));
    }

    #[test]
    fn mixed_separators_compare_equivalently() {
        assert_eq!(relative_to(r"C:\work", "C:/work/src/main.rs"), "src/main.rs");
        assert_eq!(relative_to("C:/work", r"C:\work\src"), "src");
        assert!(is_descendant_of(r"\a\b", "/a"));
    }

    #[test]
    fn descendant_includes_self() {
        assert!(is_descendant_of("/a", "/a"));
        assert!(is_descendant_of("/a/", "/a"));
        assert!(is_descendant_of("/a/b/c", "/a"));
        assert!(!is_descendant_of("/a", "/a/b"));
        assert!(!is_descendant_of("/a", ""));
    }

    #[test]
    fn relative_path_is_component_wise() {
        assert_eq!(
            relative_path(Path::new("/one"), Path::new("/one/two/three.txt")),
            PathBuf::from("two/three.txt")
        );
        assert_eq!(
            relative_path(Path::new("/one"), Path::new("/one_two")),
            PathBuf::from("/one_two")
        );
        assert_eq!(
            relative_path(Path::new("/one"), Path::new("/one")),
            PathBuf::new()
        );
    }
}
