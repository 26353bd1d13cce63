//! Exclude-aware directory measurement.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, trace};
use walkdir::WalkDir;

use backtally_core::{ScanConfig, ScanError, ScanReport, ScanResult, ScanWarning, WarningKind};

use crate::inode::{FileId, InodeTracker};
use crate::pattern::ExcludeSet;

/// Sequential scanner measuring what a backup of a path would transfer.
///
/// Applies the same exclusion and hardlink-deduplication rules as the
/// companion backup engine, so displayed estimates agree with what an actual
/// run will copy.
#[derive(Debug, Default)]
pub struct Scanner;

impl Scanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Measure total size and distinct file count under the configured root.
    ///
    /// Blocking call; run it off the interactive thread (see
    /// [`start_path_info`](crate::start_path_info)).
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanReport, ScanError> {
        let start = Instant::now();
        let root = config.root.as_path();

        let root_metadata = fs::metadata(root).map_err(|e| ScanError::io(root, e))?;

        // A single explicit file target is measured as-is; no pattern
        // matching applies.
        if !root_metadata.is_dir() {
            return Ok(ScanReport::new(
                config.root.clone(),
                ScanResult::new(root_metadata.len(), 1),
                Vec::new(),
                start.elapsed(),
            ));
        }

        let excludes = ExcludeSet::compile(&config.exclude_patterns)?;
        debug!(root = %root.display(), patterns = excludes.len(), "starting scan");

        let mut seen = InodeTracker::new();
        let mut counted = InodeTracker::new();
        // Files counted on platforms where no stable file identity exists.
        let mut unidentified: u64 = 0;
        let mut total_size: u64 = 0;
        let mut warnings: Vec<ScanWarning> = Vec::new();

        // Name-ordered traversal keeps "first seen" deterministic when
        // hardlinked names race for it.
        let mut walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    warnings.push(ScanWarning::new(path, err.to_string(), WarningKind::ReadError));
                    continue;
                }
            };

            let file_type = entry.file_type();

            if file_type.is_dir() {
                // Matching the directory itself prunes the whole subtree:
                // nothing under it is read or stat'd.
                if excludes.is_excluded(entry.path()) {
                    trace!(path = %entry.path().display(), "pruning excluded subtree");
                    walker.skip_current_dir();
                }
                continue;
            }

            // The backup engine doesn't follow symlinks, so they never count.
            if file_type.is_symlink() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => match err.io_error().map(io::Error::kind) {
                    Some(io::ErrorKind::NotFound) => {
                        warnings.push(ScanWarning::vanished(entry.path()));
                        continue;
                    }
                    Some(io::ErrorKind::PermissionDenied) => {
                        warnings.push(ScanWarning::permission_denied(entry.path()));
                        continue;
                    }
                    _ => {
                        return Err(ScanError::Io {
                            path: entry.path().to_path_buf(),
                            source: err.into(),
                        });
                    }
                },
            };

            let excluded = excludes.is_excluded(entry.path());

            match FileId::from_metadata(&metadata) {
                Some(id) => {
                    // The first name seen for a physical file settles it:
                    // later hardlinked names contribute nothing, regardless
                    // of their own exclusion status (the backup engine
                    // accounts the same way).
                    if seen.track(id) && !excluded {
                        total_size += metadata.len();
                        counted.track(id);
                    }
                }
                None => {
                    if !excluded {
                        total_size += metadata.len();
                        unidentified += 1;
                    }
                }
            }
        }

        let result = ScanResult::new(total_size, counted.len() as u64 + unidentified);
        debug!(
            root = %root.display(),
            total_size_bytes = result.total_size_bytes,
            file_count = result.file_count,
            warnings = warnings.len(),
            "scan finished"
        );

        Ok(ScanReport::new(
            config.root.clone(),
            result,
            warnings,
            start.elapsed(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("b")).unwrap();
        fs::write(root.join("a.txt"), vec![0u8; 100]).unwrap();
        fs::write(root.join("b/c.txt"), vec![0u8; 200]).unwrap();
        fs::write(root.join("b/d.txt"), vec![0u8; 50]).unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let report = Scanner::new().scan(&config).unwrap();

        assert_eq!(report.total_size_bytes(), 350);
        assert_eq!(report.file_count(), 3);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_root_itself_excluded() {
        let temp = create_test_tree();
        let pattern = temp.path().display().to_string();
        let config = ScanConfig::builder()
            .root(temp.path())
            .exclude_patterns(vec![pattern])
            .build()
            .unwrap();

        let report = Scanner::new().scan(&config).unwrap();

        assert_eq!(report.result, ScanResult::new(0, 0));
    }

    #[test]
    fn test_single_file_root() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path().join("a.txt"));

        let report = Scanner::new().scan(&config).unwrap();

        assert_eq!(report.result, ScanResult::new(100, 1));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let err = Scanner::new()
            .scan(&ScanConfig::new("/no/such/path/anywhere"))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_pattern_is_fatal() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .exclude_patterns(vec!["[oops".to_string()])
            .build()
            .unwrap();

        let err = Scanner::new().scan(&config).unwrap_err();
        assert!(matches!(err, ScanError::InvalidPattern { .. }));
    }
}
