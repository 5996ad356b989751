//! Classifier
//!
//! Turns one entity plus the current knowledgebase snapshot into a
//! `SignalSet`. Pure function of its inputs: no hidden state, so the
//! result is testable and cacheable. Collaborator failures (unreadable
//! file, vanished between stat and read) become an inconclusive signal,
//! never an error across the pipeline boundary.

pub mod content;
pub mod process;
pub mod types;

use std::path::Path;

pub use types::{LocationSuspicion, PatternHit, SignalSet};

use crate::engine::entity::{ContentFingerprint, Entity, EntityKind};
use crate::engine::knowledgebase::{Knowledgebase, RiskCategory};
use crate::engine::EngineOptions;

/// Extract all signals for one entity.
///
/// Name and parent-path matching is case-insensitive substring search
/// against active patterns, short-circuited per risk category: one
/// recorded match per category suffices, additional matches in the same
/// category add no evidence.
pub fn classify(
    entity: &Entity,
    fingerprint: Option<&ContentFingerprint>,
    snapshot: &Knowledgebase,
    options: &EngineOptions,
) -> SignalSet {
    let name = entity.file_name();
    let parent = entity.normalized_parent();
    let full_path = entity.normalized_path();

    let mut signals = SignalSet {
        name_matches: match_per_category(&name, snapshot),
        path_matches: match_per_category(&parent, snapshot),
        location: location_suspicion(&full_path, snapshot),
        ..Default::default()
    };

    if let Some(fp) = fingerprint {
        signals.hash_known_malicious = snapshot.is_hash_malicious(&fp.sha256);
        signals.hash_known_legitimate = snapshot.is_hash_legitimate(&fp.sha256);
    }

    // A confirmed malicious hash is definitive: nothing the content
    // pass finds can change the verdict, so skip it entirely
    if signals.hash_known_malicious {
        return signals;
    }

    match entity.kind {
        EntityKind::File => {
            if entity.size > 0 && entity.size <= options.max_content_file_size {
                match content::read_sample(Path::new(&entity.path), options.sample_bytes) {
                    Ok(sample) => {
                        let scan = content::scan_bytes(&sample, snapshot);
                        signals.content_matches = scan.matches;
                        signals.obfuscation_ratio = scan.obfuscation_ratio;
                    }
                    Err(e) => {
                        log::debug!("content read failed for {}: {}", entity.path, e);
                        return SignalSet::inconclusive();
                    }
                }
            }
        }
        EntityKind::Process => {
            if let Some(cmdline) = &entity.command_line {
                signals.content_matches = process::scan_command_line(cmdline, snapshot);
            }
        }
    }

    signals
}

/// First active pattern hit per category within one haystack
fn match_per_category(haystack: &str, snapshot: &Knowledgebase) -> Vec<PatternHit> {
    let mut hits = Vec::new();
    for category in [RiskCategory::High, RiskCategory::Medium, RiskCategory::Low] {
        if let Some(pattern) = snapshot
            .active_patterns(category)
            .find(|p| haystack.contains(&p.value))
        {
            hits.push(PatternHit::new(pattern.value.clone(), category));
        }
    }
    hits
}

/// Location suspicion from the snapshot's built-in lists
fn location_suspicion(full_path: &str, snapshot: &Knowledgebase) -> LocationSuspicion {
    if snapshot
        .locations
        .high_suspicion
        .iter()
        .any(|loc| full_path.contains(loc.as_str()))
    {
        return LocationSuspicion::High;
    }
    if snapshot
        .locations
        .medium_suspicion
        .iter()
        .any(|loc| full_path.contains(loc.as_str()))
    {
        return LocationSuspicion::Medium;
    }
    LocationSuspicion::None
}

// ============================================================================
// TESTS
// ============================================================================
