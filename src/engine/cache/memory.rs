//! In-memory verdict cache over a sharded concurrent map. Entries are
//! independent, so workers never contend across keys.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::{CacheEntry, IdentityKey, VerdictCache};

#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<IdentityKey, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VerdictCache for MemoryCache {
    fn get(&self, key: &IdentityKey) -> Option<CacheEntry> {
        self.entries.get(key).map(|e| e.clone())
    }

    fn put(&self, entry: CacheEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    fn record_hit(&self, key: &IdentityKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.scan_count += 1;
            entry.last_scanned = Utc::now();
        }
    }

    fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        // Counted inside the closure: concurrent puts during the pass
        // make a before/after length difference meaningless
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = entry.last_scanned >= cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scoring::{AlertLevel, Verdict};
    use chrono::Duration;
    use std::collections::BTreeMap;

    fn key(path: &str) -> IdentityKey {
        IdentityKey {
            path: path.to_string(),
            size: 10,
            modified_ms: 1_700_000_000_000,
        }
    }

    fn verdict() -> Verdict {
        Verdict {
            score: 0.0,
            alert_level: AlertLevel::Normal,
            factors: BTreeMap::new(),
            suppressed_by_legitimacy: false,
        }
    }

    #[test]
    fn test_put_get_and_hit_bookkeeping() {
        let cache = MemoryCache::new();
        let k = key("/a/b.jar");
        cache.put(CacheEntry::new(k.clone(), "fp".into(), 1, verdict()));

        cache.record_hit(&k);
        cache.record_hit(&k);
        let entry = cache.get(&k).unwrap();
        assert_eq!(entry.scan_count, 3);
    }

    #[test]
    fn test_replace_not_merge() {
        let cache = MemoryCache::new();
        let k = key("/a/b.jar");
        let mut first = CacheEntry::new(k.clone(), "fp-old".into(), 1, verdict());
        first.scan_count = 9;
        cache.put(first);
        cache.put(CacheEntry::new(k.clone(), "fp-new".into(), 2, verdict()));

        let entry = cache.get(&k).unwrap();
        assert_eq!(entry.fingerprint, "fp-new");
        assert_eq!(entry.scan_count, 1);
    }

    #[test]
    fn test_purge_retention_window() {
        let cache = MemoryCache::new();
        let stale_key = key("/old.jar");
        let mut stale = CacheEntry::new(stale_key.clone(), "fp".into(), 1, verdict());
        stale.last_scanned = Utc::now() - Duration::days(45);
        cache.put(stale);
        cache.put(CacheEntry::new(key("/fresh.jar"), "fp".into(), 1, verdict()));

        let removed = cache.purge_expired(30);
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&stale_key).is_none());
    }

    #[test]
    fn test_purge_during_concurrent_inserts() {
        let cache = MemoryCache::new();
        let stale = 1_000;
        for i in 0..stale {
            let mut entry = CacheEntry::new(key(&format!("/old/{}.jar", i)), "fp".into(), 1, verdict());
            entry.last_scanned = Utc::now() - Duration::days(45);
            cache.put(entry);
        }

        let removed = std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..stale {
                    cache.put(CacheEntry::new(
                        key(&format!("/new/{}.jar", i)),
                        "fp".into(),
                        1,
                        verdict(),
                    ));
                }
            });
            cache.purge_expired(30)
        });

        // Only stale entries are counted, whatever landed mid-pass
        assert!(removed <= stale);
        for i in 0..stale {
            assert!(cache.get(&key(&format!("/new/{}.jar", i))).is_some());
        }
    }

    #[test]
    fn test_distinct_identities_are_independent() {
        // Same fingerprint under two identities stays two entries
        let cache = MemoryCache::new();
        cache.put(CacheEntry::new(key("/a/one.jar"), "same-fp".into(), 1, verdict()));
        cache.put(CacheEntry::new(key("/b/two.jar"), "same-fp".into(), 1, verdict()));
        assert_eq!(cache.len(), 2);
    }
}
