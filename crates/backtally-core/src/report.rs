//! Scan result containers.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;

/// Totals produced by a scan. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Sum of sizes of all distinct, non-excluded regular files.
    pub total_size_bytes: u64,
    /// Number of distinct, non-excluded regular files.
    pub file_count: u64,
}

impl ScanResult {
    /// Create a new result.
    pub fn new(total_size_bytes: u64, file_count: u64) -> Self {
        Self {
            total_size_bytes,
            file_count,
        }
    }
}

/// Complete outcome of one measurement scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Root path that was measured.
    pub root: PathBuf,

    /// Aggregated totals.
    pub result: ScanResult,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub duration: Duration,

    /// Non-fatal warnings encountered during the walk.
    pub warnings: Vec<ScanWarning>,
}

impl ScanReport {
    /// Create a new report.
    pub fn new(
        root: PathBuf,
        result: ScanResult,
        warnings: Vec<ScanWarning>,
        duration: Duration,
    ) -> Self {
        Self {
            root,
            result,
            scanned_at: SystemTime::now(),
            duration,
            warnings,
        }
    }

    /// Total size in bytes.
    pub fn total_size_bytes(&self) -> u64 {
        self.result.total_size_bytes
    }

    /// Number of distinct files.
    pub fn file_count(&self) -> u64 {
        self.result.file_count
    }

    /// Check if there were any warnings during the scan.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
