//! Engine Module - Detection Pipeline
//!
//! `ScanEngine` wires the pieces together: fingerprint, cache lookup,
//! classify, legitimacy filter, scoring, cache store. One call per
//! entity, safe to invoke from many workers concurrently.

pub mod cache;
pub mod classifier;
pub mod entity;
pub mod feedback;
pub mod knowledgebase;
pub mod legitimacy;
pub mod scanner;
pub mod scoring;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants;
use cache::{CacheEntry, IdentityKey, VerdictCache};
use entity::{Entity, EntityKind};
use feedback::{FeedbackError, FeedbackRecord};
use knowledgebase::{Knowledgebase, KnowledgebaseStore};
use legitimacy::LegitimacyContext;
use scoring::{AlertLevel, Verdict};

// ============================================================================
// OPTIONS
// ============================================================================

/// Resource limits for one engine instance
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Content inspection window
    pub sample_bytes: usize,
    /// Files above this size skip content inspection
    pub max_content_file_size: u64,
    /// Full-content fingerprint ceiling; larger files hash the head only
    pub full_hash_ceiling: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            sample_bytes: constants::DEFAULT_SAMPLE_BYTES,
            max_content_file_size: constants::DEFAULT_MAX_CONTENT_FILE_SIZE,
            full_hash_ceiling: constants::DEFAULT_FULL_HASH_CEILING,
        }
    }
}

// ============================================================================
// STATISTICS
// ============================================================================

/// Aggregate counters, updated lock-free by workers
#[derive(Default)]
pub struct EngineStats {
    scanned: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    inconclusive: AtomicU64,
    normal: AtomicU64,
    low_suspicion: AtomicU64,
    suspicious: AtomicU64,
    critical: AtomicU64,
}

impl EngineStats {
    fn record_verdict(&self, verdict: &Verdict) {
        self.scanned.fetch_add(1, Ordering::Relaxed);
        let counter = match verdict.alert_level {
            AlertLevel::Normal => &self.normal,
            AlertLevel::LowSuspicion => &self.low_suspicion,
            AlertLevel::Suspicious => &self.suspicious,
            AlertLevel::Critical => &self.critical,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_inconclusive(&self) {
        self.scanned.fetch_add(1, Ordering::Relaxed);
        self.inconclusive.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EngineStatsSnapshot {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        EngineStatsSnapshot {
            scanned: self.scanned.load(Ordering::Relaxed),
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_ratio: if lookups > 0 {
                hits as f64 / lookups as f64
            } else {
                0.0
            },
            inconclusive: self.inconclusive.load(Ordering::Relaxed),
            normal: self.normal.load(Ordering::Relaxed),
            low_suspicion: self.low_suspicion.load(Ordering::Relaxed),
            suspicious: self.suspicious.load(Ordering::Relaxed),
            critical: self.critical.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatsSnapshot {
    pub scanned: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_ratio: f64,
    pub inconclusive: u64,
    pub normal: u64,
    pub low_suspicion: u64,
    pub suspicious: u64,
    pub critical: u64,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct ScanEngine {
    kb: Arc<KnowledgebaseStore>,
    cache: Arc<dyn VerdictCache>,
    options: EngineOptions,
    stats: EngineStats,
}

impl ScanEngine {
    pub fn new(kb: Arc<KnowledgebaseStore>, cache: Arc<dyn VerdictCache>) -> Self {
        Self::with_options(kb, cache, EngineOptions::default())
    }

    pub fn with_options(
        kb: Arc<KnowledgebaseStore>,
        cache: Arc<dyn VerdictCache>,
        options: EngineOptions,
    ) -> Self {
        Self {
            kb,
            cache,
            options,
            stats: EngineStats::default(),
        }
    }

    pub fn knowledgebase(&self) -> &KnowledgebaseStore {
        &self.kb
    }

    pub fn cache(&self) -> &dyn VerdictCache {
        self.cache.as_ref()
    }

    pub fn stats_snapshot(&self) -> EngineStatsSnapshot {
        self.stats.snapshot()
    }

    /// Run the full pipeline for one entity. `None` means the entity
    /// could not be inspected: skip it, do not report it as clean.
    pub fn scan_entity(&self, entity: &Entity) -> Option<Verdict> {
        self.scan_entity_with_context(entity, &LegitimacyContext::default())
    }

    pub fn scan_entity_with_context(
        &self,
        entity: &Entity,
        context: &LegitimacyContext,
    ) -> Option<Verdict> {
        // One snapshot reference for the whole classification; a
        // concurrent ingest cannot tear it.
        let snapshot = self.kb.snapshot();

        match entity.kind {
            EntityKind::File => self.scan_file(entity, &snapshot, context),
            EntityKind::Process => self.scan_process(entity, &snapshot, context),
        }
    }

    fn scan_file(
        &self,
        entity: &Entity,
        snapshot: &Arc<Knowledgebase>,
        context: &LegitimacyContext,
    ) -> Option<Verdict> {
        let fingerprint = match entity::fingerprint_file(
            Path::new(&entity.path),
            entity.size,
            self.options.full_hash_ceiling,
        ) {
            Ok(fp) => fp,
            Err(e) => {
                log::debug!("fingerprint failed for {}: {}", entity.path, e);
                self.stats.record_inconclusive();
                return None;
            }
        };

        let key = IdentityKey::of(entity);

        if let Some(key) = &key {
            if let Some(hit) = self.cache.get(key) {
                if hit.fingerprint == fingerprint.sha256 && hit.kb_version == snapshot.version {
                    self.cache.record_hit(key);
                    self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
                    self.stats.record_verdict(&hit.verdict);
                    return Some(hit.verdict);
                }
            }
            self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);
        }

        let signals = classifier::classify(entity, Some(&fingerprint), snapshot, &self.options);
        if signals.inconclusive {
            self.stats.record_inconclusive();
            return None;
        }

        let suppression = legitimacy::suppress(entity, &signals, snapshot, context);
        let verdict = scoring::score(&signals, &suppression);

        if let Some(key) = key {
            self.cache.put(CacheEntry::new(
                key,
                fingerprint.sha256,
                snapshot.version,
                verdict.clone(),
            ));
        }

        self.stats.record_verdict(&verdict);
        Some(verdict)
    }

    fn scan_process(
        &self,
        entity: &Entity,
        snapshot: &Arc<Knowledgebase>,
        context: &LegitimacyContext,
    ) -> Option<Verdict> {
        // Best-effort executable fingerprint; a missing exe is not
        // inconclusive, the command line still carries evidence
        let fingerprint = entity.exe_path.as_ref().and_then(|exe| {
            let path = Path::new(exe);
            let size = path.metadata().map(|m| m.len()).ok()?;
            entity::fingerprint_file(path, size, self.options.full_hash_ceiling).ok()
        });

        let signals = classifier::classify(entity, fingerprint.as_ref(), snapshot, &self.options);
        if signals.inconclusive {
            self.stats.record_inconclusive();
            return None;
        }

        let suppression = legitimacy::suppress(entity, &signals, snapshot, context);
        let verdict = scoring::score(&signals, &suppression);
        self.stats.record_verdict(&verdict);
        Some(verdict)
    }

    /// Ingest one feedback record and publish the resulting snapshot
    pub fn ingest_feedback(
        &self,
        record: &FeedbackRecord,
    ) -> Result<Arc<Knowledgebase>, FeedbackError> {
        let delta = feedback::ingest(record)?;
        Ok(self.kb.apply(&delta))
    }
}
