//! Background one-shot measurement.

use std::path::PathBuf;

use tokio::sync::oneshot;
use tokio::task;

use backtally_core::{ScanConfig, ScanError};

use crate::scanner::Scanner;

/// Message delivered when a background path measurement finishes.
///
/// Size and file count are formatted as base-10 strings, ready for direct
/// display by a UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    /// The path that was measured, exactly as submitted.
    pub path: String,
    /// Total size in bytes.
    pub size: String,
    /// Number of distinct files.
    pub file_count: String,
}

/// Measure a path on a worker task and deliver exactly one result message.
///
/// The blocking scan runs on the runtime's blocking pool, one worker per
/// invocation; there is no cancellation and no timeout. Concurrent
/// invocations don't interfere: each scan owns its own state.
///
/// Must be called within a tokio runtime.
pub fn start_path_info(
    path: PathBuf,
    exclude_pattern_blob: &str,
) -> oneshot::Receiver<Result<PathInfo, ScanError>> {
    let (tx, rx) = oneshot::channel();
    let config = ScanConfig::with_pattern_blob(path, exclude_pattern_blob);

    task::spawn_blocking(move || {
        let outcome = Scanner::new().scan(&config).map(|report| PathInfo {
            path: config.root.display().to_string(),
            size: report.total_size_bytes().to_string(),
            file_count: report.file_count().to_string(),
        });
        // Receiver may already be gone; nothing left to notify then.
        let _ = tx.send(outcome);
    });

    rx
}
