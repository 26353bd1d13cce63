//! Path normalization helpers.

use std::borrow::Cow;

/// Normalize a user-supplied path string to the platform's canonical Unicode
/// form.
///
/// HFS+ converts paths to canonical decomposition (NFD), so on macOS two
/// visually identical strings can differ byte-wise and pattern/path
/// comparisons must not be defeated by that. Other filesystems store paths
/// byte-exact, so elsewhere this is the identity function.
#[cfg(target_os = "macos")]
pub fn normalize_os_path(path: &str) -> Cow<'_, str> {
    use unicode_normalization::{UnicodeNormalization, is_nfd};

    if is_nfd(path) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(path.nfd().collect())
    }
}

#[cfg(not(target_os = "macos"))]
pub fn normalize_os_path(path: &str) -> Cow<'_, str> {
    Cow::Borrowed(path)
}

/// Lexically normalize a path string.
///
/// Collapses duplicate separators and `.` segments, resolves `..` against
/// prior segments, and drops any trailing separator. Purely textual; the
/// filesystem is never consulted, so a `..` over a symlink is resolved the
/// same way the companion backup engine resolves its patterns.
pub fn clean_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&"..") => parts.push(".."),
                Some(_) => {
                    parts.pop();
                }
                None => {
                    if !absolute {
                        parts.push("..");
                    }
                }
            },
            segment => parts.push(segment),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_collapses_segments() {
        assert_eq!(clean_path("a/./b"), "a/b");
        assert_eq!(clean_path("a//b"), "a/b");
        assert_eq!(clean_path("a/foo/../b"), "a/b");
        assert_eq!(clean_path("/home/user/cache/"), "/home/user/cache");
    }

    #[test]
    fn test_clean_path_parent_handling() {
        assert_eq!(clean_path("a/../../b"), "../b");
        assert_eq!(clean_path("../../a"), "../../a");
        assert_eq!(clean_path("/a/../../b"), "/b");
        assert_eq!(clean_path("/.."), "/");
    }

    #[test]
    fn test_clean_path_degenerate() {
        assert_eq!(clean_path(""), ".");
        assert_eq!(clean_path("."), ".");
        assert_eq!(clean_path("/"), "/");
    }

    #[test]
    fn test_normalize_os_path_identity_outside_macos() {
        #[cfg(not(target_os = "macos"))]
        {
            let path = "caf\u{e9}/data";
            assert!(matches!(normalize_os_path(path), Cow::Borrowed(_)));
        }
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_normalize_os_path_decomposes() {
        // Precomposed e-acute becomes e + combining acute.
        assert_eq!(normalize_os_path("caf\u{e9}"), "cafe\u{301}");
    }
}
