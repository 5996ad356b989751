//! Cheat Scanner - Command-Line Entry Point
//!
//! Loads learned state, sweeps the requested roots (and optionally the
//! process table) and prints every flagged verdict. Exit code 1 when
//! anything was flagged, so wrappers can branch on the result.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use cheatscan_core::constants;
use cheatscan_core::engine::cache::MemoryCache;
use cheatscan_core::engine::knowledgebase::{storage, KnowledgebaseStore};
use cheatscan_core::engine::scanner::{self, ScanOptions, ScanReport};
use cheatscan_core::engine::ScanEngine;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("cheatscan v{} starting", constants::APP_VERSION);

    let mut scan_procs = false;
    let mut roots: Vec<PathBuf> = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--processes" | "-p" => scan_procs = true,
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => roots.push(PathBuf::from(other)),
        }
    }
    if roots.is_empty() && !scan_procs {
        roots.push(PathBuf::from("."));
    }

    let kb_path = storage::default_knowledgebase_path();
    let kb = Arc::new(KnowledgebaseStore::load_or_default(&kb_path));
    let engine = ScanEngine::new(kb, Arc::new(MemoryCache::new()));
    let options = ScanOptions::default();

    let mut any_flagged = false;

    for root in &roots {
        log::info!("Scanning {}", root.display());
        let report = scanner::scan_root(&engine, root, &options);
        any_flagged |= print_report(&report);
    }

    if scan_procs {
        log::info!("Scanning running processes");
        let report = scanner::scan_processes(&engine, &options);
        any_flagged |= print_report(&report);
    }

    let stats = engine.stats_snapshot();
    log::info!(
        "Done: {} scanned, {} inconclusive, cache hit ratio {:.0}%, {} critical / {} suspicious / {} low",
        stats.scanned,
        stats.inconclusive,
        stats.cache_hit_ratio * 100.0,
        stats.critical,
        stats.suspicious,
        stats.low_suspicion
    );

    if any_flagged {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Print flagged verdicts of one sweep; true when anything was flagged
fn print_report(report: &ScanReport) -> bool {
    if !report.completed {
        log::warn!(
            "Sweep stopped at the wall-clock budget after {:?}; results are partial",
            report.elapsed
        );
    }
    if report.skipped > 0 {
        log::info!("{} entities could not be inspected", report.skipped);
    }

    let mut flagged = false;
    for (entity, verdict) in report.flagged() {
        flagged = true;
        println!(
            "[{:?}] {:>5.1}  {}",
            verdict.alert_level, verdict.score, entity.path
        );
        for (factor, points) in &verdict.factors {
            println!("         {:+6.1}  {:?}", points, factor);
        }
        if verdict.suppressed_by_legitimacy {
            println!("         downgraded by legitimacy evidence");
        }
    }
    flagged
}

fn print_usage() {
    println!("cheatscan v{}", constants::APP_VERSION);
    println!();
    println!("Usage: cheatscan [ROOT ...] [--processes]");
    println!();
    println!("  ROOT          directories to sweep (default: current directory)");
    println!("  --processes   also sweep the running process table");
    println!();
    println!("Environment:");
    println!("  CHEATSCAN_WORKERS           worker thread count");
    println!("  CHEATSCAN_SCAN_BUDGET_SECS  wall-clock budget per sweep");
    println!("  RUST_LOG                    log filter (default: info)");
}
