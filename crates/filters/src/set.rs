use std::path::{Component, Path};

use globset::{GlobBuilder, GlobMatcher};
use logging::debug_log;

use crate::ExclusionError;

const GLOB_METACHARACTERS: [char; 3] = ['*', '?', '['];

/// Ordered, de-duplicated collection of relative exclusion patterns.
///
/// Every pattern is interpreted relative to the root being scanned. Patterns
/// are normalized on entry: `\` becomes `/`, `.` segments and empty segments
/// are dropped, so leading `./`, leading and trailing `/` and repeated
/// separators all vanish. Entries that normalize to nothing are discarded and
/// duplicates keep their first-seen position.
///
/// Plain patterns match a relative path exactly. A pattern containing `*`,
/// `?` or `[` is also compiled as a glob anchored at the scanned root, where
/// wildcards never cross a `/`.
///
/// # Examples
///
/// ```
/// use filters::ExclusionSet;
///
/// let set = ExclusionSet::normalize(["./build/", r"cache\tmp", "build", "*.log"]).unwrap();
///
/// assert_eq!(set.patterns().collect::<Vec<_>>(), ["build", "cache/tmp", "*.log"]);
/// assert!(set.matches("cache/tmp"));
/// assert!(set.matches("debug.log"));
/// assert!(!set.matches("nested/debug.log"));
/// assert!(!set.matches("build/output.o"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExclusionSet {
    entries: Vec<Exclusion>,
}

#[derive(Clone, Debug)]
struct Exclusion {
    pattern: String,
    glob: Option<GlobMatcher>,
}

impl Exclusion {
    fn compile(pattern: String) -> Result<Self, ExclusionError> {
        let glob = if pattern.contains(GLOB_METACHARACTERS) {
            let compiled = GlobBuilder::new(&pattern)
                .literal_separator(true)
                .backslash_escape(false)
                .build()
                .map_err(|source| ExclusionError::InvalidGlob {
                    pattern: pattern.clone(),
                    source,
                })?;
            Some(compiled.compile_matcher())
        } else {
            None
        };
        Ok(Self { pattern, glob })
    }

    fn matches(&self, relative: &str) -> bool {
        self.pattern == relative
            || self
                .glob
                .as_ref()
                .is_some_and(|glob| glob.is_match(relative))
    }
}

impl ExclusionSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a set from caller-supplied patterns.
    pub fn normalize<I, S>(raw: I) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for pattern in raw {
            set.push(pattern.as_ref())?;
        }
        Ok(set)
    }

    /// Appends a pattern when its normalized form is new.
    ///
    /// Returns `Ok(false)` for duplicates and patterns that normalize to
    /// nothing.
    pub fn push(&mut self, pattern: &str) -> Result<bool, ExclusionError> {
        let normalized = normalize_pattern(pattern);
        if normalized.is_empty() {
            debug_log!(Exclude, 2, "dropping empty exclusion '{pattern}'");
            return Ok(false);
        }
        if self.entries.iter().any(|entry| entry.pattern == normalized) {
            debug_log!(Exclude, 2, "dropping duplicate exclusion '{normalized}'");
            return Ok(false);
        }

        debug_log!(Exclude, 1, "exclusion '{normalized}'");
        self.entries.push(Exclusion::compile(normalized)?);
        Ok(true)
    }

    /// Appends a literal root-relative filesystem path when it is new.
    ///
    /// Unlike [`push`](Self::push), component contents are kept verbatim:
    /// `\` inside a Unix file name is not a separator and glob
    /// metacharacters match only themselves. Returns `false` for duplicates
    /// and paths with no normal components.
    pub fn push_path(&mut self, relative: &Path) -> bool {
        let rendered = render_components(relative);
        if rendered.is_empty() || self.entries.iter().any(|entry| entry.pattern == rendered) {
            return false;
        }
        debug_log!(Exclude, 1, "literal exclusion '{rendered}'");
        self.entries.push(Exclusion {
            pattern: rendered,
            glob: None,
        });
        true
    }

    /// Returns a copy of the set with `extra` appended.
    pub fn extended_with<I, S>(&self, extra: I) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = self.clone();
        for pattern in extra {
            set.push(pattern.as_ref())?;
        }
        Ok(set)
    }

    /// Reports whether a root-relative path matches any exclusion.
    ///
    /// The path is normalized the same way patterns are.
    #[must_use]
    pub fn matches(&self, relative: &str) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let normalized = normalize_pattern(relative);
        self.matches_normalized(&normalized)
    }

    /// Reports whether a root-relative filesystem path matches any exclusion.
    ///
    /// Components are joined with `/` without rewriting their contents, so a
    /// Unix file name containing `\` is compared as-is.
    #[must_use]
    pub fn matches_path(&self, relative: &Path) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.matches_normalized(&render_components(relative))
    }

    fn matches_normalized(&self, relative: &str) -> bool {
        if relative.is_empty() {
            return false;
        }
        self.entries.iter().any(|entry| entry.matches(relative))
    }

    /// Iterates over the normalized patterns in insertion order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.pattern.as_str())
    }

    /// Iterates over the patterns with a leading `/`, anchoring each one at
    /// the transfer root for external tools.
    pub fn rooted_patterns(&self) -> impl Iterator<Item = String> + '_ {
        self.patterns().map(|pattern| format!("/{pattern}"))
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the set has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for ExclusionSet {
    fn eq(&self, other: &Self) -> bool {
        self.patterns().eq(other.patterns())
    }
}

impl Eq for ExclusionSet {}

fn render_components(relative: &Path) -> String {
    let mut rendered = String::new();
    for component in relative.components() {
        if let Component::Normal(name) = component {
            if !rendered.is_empty() {
                rendered.push('/');
            }
            rendered.push_str(&name.to_string_lossy());
        }
    }
    rendered
}

fn normalize_pattern(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for segment in raw.split(['/', '\\']) {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if !normalized.is_empty() {
            normalized.push('/');
        }
        normalized.push_str(segment);
    }
    normalized
}
