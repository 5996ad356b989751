//! Knowledgebase - learned hashes, keyword patterns and legitimacy rules
//!
//! Published as immutable, versioned snapshots. A snapshot is never
//! mutated in place: feedback ingestion builds a new snapshot and the
//! store swaps a single pointer, so concurrent classifications never
//! observe a half-updated knowledgebase. In-flight classifications keep
//! using the snapshot reference they captured at start.

pub mod defaults;
pub mod storage;
pub mod types;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub use types::{
    KnowledgebaseDelta, LearnedHash, LearnedPattern, LegitimacyRules, LocationRules, RiskCategory,
};

// ============================================================================
// SNAPSHOT
// ============================================================================

/// One immutable, versioned aggregate of built-in defaults, learned
/// patterns/hashes and legitimacy rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Knowledgebase {
    pub version: u64,
    pub patterns: Vec<LearnedPattern>,
    /// Keyed by lowercase hex sha256
    pub hashes: HashMap<String, LearnedHash>,
    pub legitimacy: LegitimacyRules,
    pub locations: LocationRules,
}

impl Knowledgebase {
    pub fn builtin() -> Self {
        defaults::builtin_knowledgebase()
    }

    /// Active patterns of one risk category
    pub fn active_patterns(&self, category: RiskCategory) -> impl Iterator<Item = &LearnedPattern> {
        self.patterns
            .iter()
            .filter(move |p| p.active && p.category == category)
    }

    /// All active patterns, any category
    pub fn all_active_patterns(&self) -> impl Iterator<Item = &LearnedPattern> {
        self.patterns.iter().filter(|p| p.active)
    }

    pub fn is_hash_malicious(&self, hash: &str) -> bool {
        self.hashes
            .get(&hash.to_lowercase())
            .map(|h| h.is_malicious)
            .unwrap_or(false)
    }

    pub fn is_hash_legitimate(&self, hash: &str) -> bool {
        self.hashes
            .get(&hash.to_lowercase())
            .map(|h| !h.is_malicious)
            .unwrap_or(false)
    }

    /// New snapshot = self UNION delta, version bumped. Append-only:
    /// existing entries are refreshed or superseded, never removed.
    pub fn with_delta(&self, delta: &KnowledgebaseDelta) -> Knowledgebase {
        let mut next = self.clone();
        next.version = self.version + 1;

        for incoming in &delta.patterns {
            match next
                .patterns
                .iter_mut()
                .find(|p| p.value == incoming.value && p.category == incoming.category)
            {
                Some(existing) => {
                    existing.learned_count += incoming.learned_count.max(1);
                    existing.confidence = existing.confidence.max(incoming.confidence);
                    existing.active = true;
                }
                None => next.patterns.push(incoming.clone()),
            }
        }

        for incoming in &delta.hashes {
            let key = incoming.hash.to_lowercase();
            match next.hashes.get_mut(&key) {
                Some(existing) => {
                    existing.confirmed_count += incoming.confirmed_count.max(1);
                    // Latest label supersedes; old snapshots stay intact
                    existing.is_malicious = incoming.is_malicious;
                    existing.source_feedback_id = incoming.source_feedback_id;
                }
                None => {
                    next.hashes.insert(key, incoming.clone());
                }
            }
        }

        next.legitimacy.merge(&delta.legitimacy);
        next
    }
}

// ============================================================================
// STORE
// ============================================================================

/// Holds the current snapshot behind a lock-free pointer. Readers call
/// `snapshot()` with no locking; writers are serialized by a mutex so
/// two concurrent deltas cannot both build from the same parent.
pub struct KnowledgebaseStore {
    current: ArcSwap<Knowledgebase>,
    write_lock: Mutex<()>,
}

impl KnowledgebaseStore {
    pub fn new(kb: Knowledgebase) -> Self {
        Self {
            current: ArcSwap::from_pointee(kb),
            write_lock: Mutex::new(()),
        }
    }

    /// Load learned data from disk, falling back to built-in defaults.
    /// The engine must never fail to start because of a corrupt
    /// learned-data file.
    pub fn load_or_default(path: &Path) -> Self {
        match storage::load_knowledgebase(path) {
            Ok(kb) => {
                log::info!(
                    "Knowledgebase loaded: v{}, {} patterns, {} hashes",
                    kb.version,
                    kb.patterns.len(),
                    kb.hashes.len()
                );
                Self::new(kb)
            }
            Err(e) => {
                log::warn!(
                    "Knowledgebase load failed ({}), running in degraded mode with built-in defaults",
                    e
                );
                Self::new(Knowledgebase::builtin())
            }
        }
    }

    /// Current snapshot. Lock-free; the returned Arc stays valid and
    /// unchanged for as long as the caller holds it.
    pub fn snapshot(&self) -> Arc<Knowledgebase> {
        self.current.load_full()
    }

    /// Apply a delta: build the successor snapshot and publish it with
    /// a single atomic swap. Returns the published snapshot.
    pub fn apply(&self, delta: &KnowledgebaseDelta) -> Arc<Knowledgebase> {
        let _guard = self.write_lock.lock();
        let next = Arc::new(self.current.load().with_delta(delta));
        self.current.store(next.clone());
        log::debug!("Knowledgebase published: v{}", next.version);
        next
    }

    /// Replace the snapshot wholesale (startup reload)
    pub fn publish(&self, kb: Knowledgebase) -> Arc<Knowledgebase> {
        let _guard = self.write_lock.lock();
        let next = Arc::new(kb);
        self.current.store(next.clone());
        next
    }

    /// Persist the current snapshot
    pub fn save(&self, path: &Path) -> Result<(), storage::KnowledgebaseError> {
        storage::save_knowledgebase(&self.snapshot(), path)
    }
}

// ============================================================================
// TESTS
// ============================================================================
