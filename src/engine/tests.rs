//! End-to-end pipeline tests: real files on disk, the builtin
//! knowledgebase, the in-memory cache, and the public engine surface.

use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::cache::MemoryCache;
use crate::engine::entity::{self, Entity};
use crate::engine::feedback::{FeedbackRecord, HumanLabel};
use crate::engine::knowledgebase::{Knowledgebase, KnowledgebaseStore};
use crate::engine::scoring::AlertLevel;
use crate::engine::ScanEngine;

fn engine() -> ScanEngine {
    ScanEngine::new(
        Arc::new(KnowledgebaseStore::new(Knowledgebase::builtin())),
        Arc::new(MemoryCache::new()),
    )
}

fn plant_file(dir: &std::path::Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cheat_name_in_downloads_is_critical() {
    let dir = tempfile::tempdir().unwrap();
    let path = plant_file(dir.path(), "Downloads/vape_launcher.exe", b"MZ binary");

    let engine = engine();
    let entity = Entity::from_path(&path).unwrap();
    let verdict = engine.scan_entity(&entity).unwrap();

    assert!(verdict.score >= 70.0);
    assert_eq!(verdict.alert_level, AlertLevel::Critical);
    assert!(!verdict.suppressed_by_legitimacy);
}

#[test]
fn test_known_legitimate_mod_is_suppressed_to_normal() {
    let dir = tempfile::tempdir().unwrap();
    let path = plant_file(dir.path(), "mods/optifine.jar", b"PK optifine bytes");

    let engine = engine();
    let entity = Entity::from_path(&path).unwrap();
    let fp = entity::fingerprint_file(&path, entity.size, u64::MAX).unwrap();

    // Staff previously confirmed this exact build as legitimate
    let record = FeedbackRecord::new(
        "optifine.jar",
        entity.path.clone(),
        Some(fp.sha256),
        HumanLabel::Legitimate,
    );
    engine.ingest_feedback(&record).unwrap();

    let verdict = engine.scan_entity(&entity).unwrap();
    assert_eq!(verdict.score, 0.0);
    assert_eq!(verdict.alert_level, AlertLevel::Normal);
}

#[test]
fn test_feedback_hash_overrides_cached_verdict() {
    let dir = tempfile::tempdir().unwrap();
    let path = plant_file(dir.path(), "update.bin", b"innocuous looking bytes");

    let engine = engine();
    let entity = Entity::from_path(&path).unwrap();

    let before = engine.scan_entity(&entity).unwrap();
    assert_eq!(before.alert_level, AlertLevel::Normal);
    assert_eq!(engine.cache().len(), 1);

    let fp = entity::fingerprint_file(&path, entity.size, u64::MAX).unwrap();
    let record = FeedbackRecord::new(
        "update.bin",
        entity.path.clone(),
        Some(fp.sha256),
        HumanLabel::Malicious,
    );
    engine.ingest_feedback(&record).unwrap();

    // Identity and fingerprint are unchanged, but the learned hash must
    // win over the cached clean verdict
    let after = engine.scan_entity(&entity).unwrap();
    assert_eq!(after.score, 100.0);
    assert_eq!(after.alert_level, AlertLevel::Critical);
}

#[test]
fn test_rescan_is_idempotent_and_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = plant_file(dir.path(), "Downloads/killaura.jar", b"payload");

    let engine = engine();
    let entity = Entity::from_path(&path).unwrap();

    let first = engine.scan_entity(&entity).unwrap();
    let second = engine.scan_entity(&entity).unwrap();
    assert_eq!(first, second);

    let stats = engine.stats_snapshot();
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.cache_hits, 1);

    let key = crate::engine::cache::IdentityKey::of(&entity).unwrap();
    let cached = engine.cache().get(&key).unwrap();
    assert_eq!(cached.scan_count, 2);
}

#[test]
fn test_modified_file_is_reclassified() {
    let dir = tempfile::tempdir().unwrap();
    let path = plant_file(dir.path(), "Downloads/tool.jar", b"first content");

    let engine = engine();
    let entity = Entity::from_path(&path).unwrap();
    engine.scan_entity(&entity).unwrap();

    std::fs::write(&path, b"second content, different length").unwrap();
    let changed = Entity::from_path(&path).unwrap();
    engine.scan_entity(&changed).unwrap();

    let stats = engine.stats_snapshot();
    assert_eq!(stats.cache_hits, 0);
    assert_eq!(stats.cache_misses, 2);
}

#[test]
fn test_unreadable_file_is_skipped_not_reported_clean() {
    let engine = engine();
    let ghost = Entity::file("/nonexistent/dir/file.jar", 128, Some(1));

    assert!(engine.scan_entity(&ghost).is_none());
    let stats = engine.stats_snapshot();
    assert_eq!(stats.inconclusive, 1);
    assert!(engine.cache().is_empty());
}

#[test]
fn test_process_with_cheat_agent_is_flagged_and_uncached() {
    let engine = engine();
    let proc = Entity::process(
        777,
        "javaw.exe",
        None,
        Some("javaw -javaagent:C:\\Temp\\vape-killaura.jar -jar minecraft.jar".to_string()),
    );

    let verdict = engine.scan_entity(&proc).unwrap();
    assert!(verdict.is_flagged());
    assert!(engine.cache().is_empty());
}

#[test]
fn test_snapshot_isolation_under_concurrent_ingest() {
    use crate::engine::knowledgebase::{
        KnowledgebaseDelta, LearnedHash, LearnedPattern, RiskCategory,
    };

    let store = Arc::new(KnowledgebaseStore::new(Knowledgebase::builtin()));
    let rounds = 50;

    std::thread::scope(|scope| {
        let writer_store = Arc::clone(&store);
        scope.spawn(move || {
            for i in 0..rounds {
                // Each delta pairs a pattern with a hash; a reader must
                // never observe one without the other
                let delta = KnowledgebaseDelta {
                    patterns: vec![LearnedPattern::learned(
                        &format!("learnedcheat{}", i),
                        RiskCategory::High,
                        0.9,
                    )],
                    hashes: vec![LearnedHash {
                        hash: format!("{:064x}", i),
                        is_malicious: true,
                        confirmed_count: 1,
                        source_feedback_id: None,
                    }],
                    ..Default::default()
                };
                writer_store.apply(&delta);
            }
        });

        for _ in 0..4 {
            let reader_store = Arc::clone(&store);
            scope.spawn(move || {
                for _ in 0..200 {
                    let snap = reader_store.snapshot();
                    for i in 0..rounds {
                        if snap.hashes.contains_key(&format!("{:064x}", i)) {
                            assert!(snap
                                .patterns
                                .iter()
                                .any(|p| p.value == format!("learnedcheat{}", i)));
                        }
                    }
                }
            });
        }
    });

    let final_snap = store.snapshot();
    assert_eq!(final_snap.version, 1 + rounds as u64);
}
