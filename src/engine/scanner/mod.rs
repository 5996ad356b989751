//! Scan Orchestrator
//!
//! Drives many entities through the engine on a bounded worker pool.
//! The producer feeds a bounded channel so traversal never races ahead
//! of classification; workers push verdicts on an unbounded channel and
//! the caller collects after the feed ends. An optional wall-clock
//! budget cancels the sweep cooperatively: in-flight entities finish,
//! queued ones are abandoned, and the partial report is returned.

pub mod process_list;
pub mod walker;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam::channel;

use crate::constants;
use crate::engine::entity::Entity;
use crate::engine::scoring::Verdict;
use crate::engine::{EngineStatsSnapshot, ScanEngine};

// ============================================================================
// OPTIONS / REPORT
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub workers: usize,
    /// Wall-clock budget for the whole sweep
    pub budget: Option<Duration>,
    /// Pending-entity channel capacity
    pub queue_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            workers: constants::get_worker_count(),
            budget: constants::get_scan_budget_secs().map(Duration::from_secs),
            queue_depth: constants::DEFAULT_QUEUE_DEPTH,
        }
    }
}

/// Outcome of one sweep. `verdicts` holds every conclusive result,
/// flagged or not; callers filter on the alert level.
#[derive(Debug)]
pub struct ScanReport {
    pub verdicts: Vec<(Entity, Verdict)>,
    /// Entities the engine could not inspect
    pub skipped: u64,
    /// False when the budget expired before the feed was drained
    pub completed: bool,
    pub elapsed: Duration,
    pub stats: EngineStatsSnapshot,
}

impl ScanReport {
    pub fn flagged(&self) -> impl Iterator<Item = &(Entity, Verdict)> {
        self.verdicts.iter().filter(|(_, v)| v.is_flagged())
    }
}

// ============================================================================
// DRIVERS
// ============================================================================

/// Sweep every file under `root`
pub fn scan_root(engine: &ScanEngine, root: &Path, options: &ScanOptions) -> ScanReport {
    scan_entities(engine, walker::walk_files(root), options)
}

/// Sweep the running process table
pub fn scan_processes(engine: &ScanEngine, options: &ScanOptions) -> ScanReport {
    scan_entities(engine, process_list::list_processes(), options)
}

/// Run any entity stream through the worker pool
pub fn scan_entities<I>(engine: &ScanEngine, entities: I, options: &ScanOptions) -> ScanReport
where
    I: IntoIterator<Item = Entity>,
{
    let started = Instant::now();
    let deadline = options.budget.map(|b| started + b);
    let workers = options.workers.max(1);
    let cancel = AtomicBool::new(false);

    let (entity_tx, entity_rx) = channel::bounded::<Entity>(options.queue_depth.max(1));
    let (result_tx, result_rx) = channel::unbounded::<(Entity, Option<Verdict>)>();

    let mut completed = true;

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let entity_rx = entity_rx.clone();
            let result_tx = result_tx.clone();
            let cancel = &cancel;
            scope.spawn(move || {
                // Dropping the receiver on cancel makes the producer's
                // next send fail, unblocking it immediately
                for entity in entity_rx.iter() {
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    let verdict = engine.scan_entity(&entity);
                    if result_tx.send((entity, verdict)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(entity_rx);
        drop(result_tx);

        for entity in entities {
            let send = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        Err(())
                    } else {
                        entity_tx
                            .send_timeout(entity, deadline - now)
                            .map_err(|_| ())
                    }
                }
                None => entity_tx.send(entity).map_err(|_| ()),
            };
            if send.is_err() {
                completed = false;
                cancel.store(true, Ordering::Relaxed);
                log::warn!(
                    "scan budget exhausted after {:?}, returning partial results",
                    started.elapsed()
                );
                break;
            }
        }
        drop(entity_tx);
    });

    let mut verdicts = Vec::new();
    let mut skipped = 0u64;
    for (entity, verdict) in result_rx.iter() {
        match verdict {
            Some(v) => verdicts.push((entity, v)),
            None => skipped += 1,
        }
    }

    ScanReport {
        verdicts,
        skipped,
        completed,
        elapsed: started.elapsed(),
        stats: engine.stats_snapshot(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cache::MemoryCache;
    use crate::engine::knowledgebase::{Knowledgebase, KnowledgebaseStore};
    use crate::engine::scoring::AlertLevel;
    use std::sync::Arc;

    fn engine() -> ScanEngine {
        ScanEngine::new(
            Arc::new(KnowledgebaseStore::new(Knowledgebase::builtin())),
            Arc::new(MemoryCache::new()),
        )
    }

    fn pool_options(workers: usize) -> ScanOptions {
        ScanOptions {
            workers,
            budget: None,
            queue_depth: 4,
        }
    }

    #[test]
    fn test_sweep_flags_planted_cheat() {
        let dir = tempfile::tempdir().unwrap();
        let downloads = dir.path().join("Downloads");
        std::fs::create_dir(&downloads).unwrap();
        std::fs::write(downloads.join("vape-lite.jar"), b"payload").unwrap();
        std::fs::write(downloads.join("notes.txt"), b"shopping list").unwrap();

        let engine = engine();
        let report = scan_root(&engine, dir.path(), &pool_options(2));

        assert!(report.completed);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.verdicts.len(), 2);
        let flagged: Vec<_> = report.flagged().collect();
        assert_eq!(flagged.len(), 1);
        assert!(flagged[0].0.path.ends_with("vape-lite.jar"));
        assert_eq!(flagged[0].1.alert_level, AlertLevel::Critical);
    }

    #[test]
    fn test_empty_input_yields_empty_complete_report() {
        let engine = engine();
        let report = scan_entities(&engine, Vec::new(), &pool_options(2));
        assert!(report.completed);
        assert!(report.verdicts.is_empty());
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_vanished_files_are_skipped_not_clean() {
        let entities = vec![
            Entity::file("/nonexistent/one.jar", 10, Some(1)),
            Entity::file("/nonexistent/two.jar", 10, Some(1)),
        ];
        let engine = engine();
        let report = scan_entities(&engine, entities, &pool_options(2));

        assert!(report.completed);
        assert!(report.verdicts.is_empty());
        assert_eq!(report.skipped, 2);
        assert_eq!(report.stats.inconclusive, 2);
    }

    #[test]
    fn test_expired_budget_returns_partial_report() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..50 {
            std::fs::write(dir.path().join(format!("f{}.txt", i)), b"x").unwrap();
        }

        let engine = engine();
        let options = ScanOptions {
            workers: 1,
            budget: Some(Duration::ZERO),
            queue_depth: 1,
        };
        let report = scan_root(&engine, dir.path(), &options);

        assert!(!report.completed);
        assert!(report.verdicts.len() < 50);
    }

    #[test]
    fn test_many_workers_produce_all_results() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..20 {
            std::fs::write(dir.path().join(format!("f{}.txt", i)), b"plain").unwrap();
        }

        let engine = engine();
        let report = scan_root(&engine, dir.path(), &pool_options(8));
        assert!(report.completed);
        assert_eq!(report.verdicts.len(), 20);
    }
}
