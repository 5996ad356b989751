//! Central Configuration Constants
//!
//! Single source of truth for engine defaults. To change a scan limit
//! or the data directory, only edit this file.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name (also the data directory name)
pub const APP_NAME: &str = "cheatscan";

/// Bytes sampled from the head of a file for content inspection
pub const DEFAULT_SAMPLE_BYTES: usize = 1024 * 1024;

/// Files above this size skip content inspection entirely
pub const DEFAULT_MAX_CONTENT_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Files up to this size get a full-content fingerprint; larger files
/// are fingerprinted from the sampled head only
pub const DEFAULT_FULL_HASH_CEILING: u64 = 64 * 1024 * 1024;

/// Cache entries untouched for this many days are purged
pub const DEFAULT_CACHE_RETENTION_DAYS: i64 = 30;

/// Worker threads per available CPU core
pub const DEFAULT_WORKERS_PER_CORE: usize = 2;

/// Bounded depth of the traversal work queue
pub const DEFAULT_QUEUE_DEPTH: usize = 256;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Data directory for learned state (knowledgebase file)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Worker pool size from environment or cores x multiplier
pub fn get_worker_count() -> usize {
    std::env::var("CHEATSCAN_WORKERS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or_else(|| {
            let cores = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            cores * DEFAULT_WORKERS_PER_CORE
        })
}

/// Optional per-traversal wall-clock budget (seconds)
pub fn get_scan_budget_secs() -> Option<u64> {
    std::env::var("CHEATSCAN_SCAN_BUDGET_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
}
