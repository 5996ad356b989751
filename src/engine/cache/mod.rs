//! Result Cache
//!
//! Memoizes per-file verdicts so unchanged files are not re-classified.
//! Identity is `(path, size, modified)`; a hit additionally requires
//! fingerprint equality AND the knowledgebase version the verdict was
//! computed under, so feedback-driven learning is never masked by a
//! stale entry. Process entities are never cached: process identity is
//! not stable across invocations.
//!
//! The cache is a constructor-injected trait object so tests use the
//! in-memory map and production can plug a persistent store.

pub mod memory;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use memory::MemoryCache;

use crate::engine::entity::Entity;
use crate::engine::scoring::Verdict;

/// Cache identity of one file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub path: String,
    pub size: u64,
    pub modified_ms: i64,
}

impl IdentityKey {
    /// Identity of a file entity; None for processes or files without
    /// a modification time (both are uncacheable)
    pub fn of(entity: &Entity) -> Option<Self> {
        match entity.kind {
            crate::engine::entity::EntityKind::File => {
                entity.modified_ms.map(|modified_ms| Self {
                    path: entity.path.clone(),
                    size: entity.size,
                    modified_ms,
                })
            }
            crate::engine::entity::EntityKind::Process => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: IdentityKey,
    /// sha256 of the content at verdict time
    pub fingerprint: String,
    /// Knowledgebase version the verdict was computed under
    pub kb_version: u64,
    pub verdict: Verdict,
    pub scan_count: u64,
    pub last_scanned: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: IdentityKey, fingerprint: String, kb_version: u64, verdict: Verdict) -> Self {
        Self {
            key,
            fingerprint,
            kb_version,
            verdict,
            scan_count: 1,
            last_scanned: Utc::now(),
        }
    }
}

/// Injected cache abstraction
pub trait VerdictCache: Send + Sync {
    fn get(&self, key: &IdentityKey) -> Option<CacheEntry>;

    /// Insert or replace; a changed file replaces its entry, never merges
    fn put(&self, entry: CacheEntry);

    /// Bump scan_count/last_scanned after a validated hit
    fn record_hit(&self, key: &IdentityKey);

    /// Batch eviction of entries not touched since the cutoff.
    /// Maintenance pass, not on the read path. Returns entries removed.
    fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Purge with the retention window expressed in days
    fn purge_expired(&self, retention_days: i64) -> usize {
        self.purge_older_than(Utc::now() - Duration::days(retention_days))
    }
}
