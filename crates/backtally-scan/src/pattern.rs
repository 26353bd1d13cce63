//! Exclude-pattern compilation and matching.
//!
//! Patterns are prepared the way the companion backup engine prepares its
//! fnmatch-style excludes, so the sizes reported here agree with what that
//! engine will actually skip. Two forms exist:
//!
//! - `path/to/dir/` (trailing separator): the directory's *contents* are
//!   excluded, the directory entry itself is retained.
//! - `path/to/thing` (no trailing separator): the path and everything under
//!   it is excluded.

use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};

use backtally_core::{ScanError, clean_path, normalize_os_path};

/// A single compiled exclude pattern.
#[derive(Debug, Clone)]
pub struct ExcludePattern {
    raw: String,
    matcher: GlobMatcher,
}

impl ExcludePattern {
    /// Compile a raw pattern string into an anchored matcher.
    ///
    /// The raw string is Unicode-normalized, lexically cleaned, rewritten to
    /// its anchored `<path>/*` or `<path>/*/` form, and compiled as a glob in
    /// which `*` matches any run of characters including separators, `?`
    /// matches one character, and `[...]` is a character class. Malformed
    /// glob syntax fails here, not at match time.
    pub fn compile(raw: &str) -> Result<Self, ScanError> {
        let normalized = normalize_os_path(raw);

        let glob = if normalized.ends_with('/') {
            // Trailing separator: exclude the contents but not the
            // directory entry itself.
            let base = clean_path(normalized.trim_end_matches('/'));
            format!("{}/*/", base.trim_end_matches('/'))
        } else {
            format!("{}/*", clean_path(&normalized))
        };

        // Patterns are matched against candidates already stripped of their
        // leading separator.
        let glob = glob.trim_start_matches('/');

        let matcher = GlobBuilder::new(glob)
            .literal_separator(false)
            .build()
            .map_err(|err| ScanError::InvalidPattern {
                pattern: raw.to_string(),
                message: err.kind().to_string(),
            })?
            .compile_matcher();

        Ok(Self {
            raw: raw.to_string(),
            matcher,
        })
    }

    /// The raw pattern string this matcher was compiled from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Check whether a path matches this pattern.
    ///
    /// The candidate is stripped of leading separators and given exactly one
    /// trailing separator before the anchored full-string match. The trailing
    /// separator is what lets `foo/*` match `foo` itself when a directory is
    /// tested for subtree exclusion.
    pub fn matches(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        let candidate = format!("{}/", text.trim_start_matches('/'));
        self.matcher.is_match(Path::new(&candidate))
    }
}

/// An ordered set of compiled exclude patterns.
///
/// A path is excluded iff at least one pattern matches; order never affects
/// the outcome.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<ExcludePattern>,
}

impl ExcludeSet {
    /// Compile every raw pattern, failing fast on the first malformed one.
    pub fn compile<I, S>(raw_patterns: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = raw_patterns
            .into_iter()
            .map(|raw| ExcludePattern::compile(raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Check whether any pattern matches the given path.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if the set holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_pattern_matches_itself_and_descendants() {
        let pattern = ExcludePattern::compile("/home/user/cache").unwrap();

        assert!(pattern.matches(Path::new("/home/user/cache")));
        assert!(pattern.matches(Path::new("/home/user/cache/a")));
        assert!(pattern.matches(Path::new("/home/user/cache/a/b.txt")));
        assert!(!pattern.matches(Path::new("/home/user/cache2")));
        assert!(!pattern.matches(Path::new("/home/user")));
    }

    #[test]
    fn test_directory_content_pattern_spares_the_directory() {
        let pattern = ExcludePattern::compile("/home/user/cache/").unwrap();

        assert!(!pattern.matches(Path::new("/home/user/cache")));
        assert!(pattern.matches(Path::new("/home/user/cache/a")));
        assert!(pattern.matches(Path::new("/home/user/cache/sub/deep.txt")));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let pattern = ExcludePattern::compile("user/cache").unwrap();

        assert!(pattern.matches(Path::new("user/cache/a")));
        // Full-string anchor: must not match mid-path.
        assert!(!pattern.matches(Path::new("/home/user/cache/a")));
    }

    #[test]
    fn test_wildcards_and_classes() {
        let star = ExcludePattern::compile("/data/*.tmp").unwrap();
        assert!(star.matches(Path::new("/data/a.tmp")));
        assert!(star.matches(Path::new("/data/nested/b.tmp")));

        let question = ExcludePattern::compile("/data/log?").unwrap();
        assert!(question.matches(Path::new("/data/log1")));
        assert!(!question.matches(Path::new("/data/log")));

        let class = ExcludePattern::compile("/data/v[0-9]").unwrap();
        assert!(class.matches(Path::new("/data/v1")));
        assert!(!class.matches(Path::new("/data/vx")));
    }

    #[test]
    fn test_pattern_normalizes_dot_segments() {
        let pattern = ExcludePattern::compile("/home/user/./cache//").unwrap();
        assert!(pattern.matches(Path::new("/home/user/cache/a")));
        assert!(!pattern.matches(Path::new("/home/user/cache")));
    }

    #[test]
    fn test_invalid_pattern_fails_at_compile_time() {
        let err = ExcludePattern::compile("/data/[unclosed").unwrap_err();
        assert!(matches!(err, ScanError::InvalidPattern { .. }));
    }

    #[test]
    fn test_exclude_set_any_match() {
        let set = ExcludeSet::compile(["/a/one", "/a/two/"]).unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.is_excluded(Path::new("/a/one/x")));
        assert!(set.is_excluded(Path::new("/a/two/x")));
        assert!(!set.is_excluded(Path::new("/a/two")));
        assert!(!set.is_excluded(Path::new("/a/three")));
    }

    #[test]
    fn test_empty_exclude_set() {
        let set = ExcludeSet::compile(Vec::<String>::new()).unwrap();
        assert!(set.is_empty());
        assert!(!set.is_excluded(Path::new("/anything")));
    }
}
