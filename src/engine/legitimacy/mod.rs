//! Legitimacy Filter
//!
//! Decides whether known-good evidence suppresses a detection.
//! Each independent signal contributes a fixed weight; the sum is
//! clamped to [0,1]. Suppression needs confidence >= 0.5 AND the
//! absence of high-category direct evidence: known-good metadata can
//! mask weak circumstantial evidence, never a confirmed byte pattern
//! or hash.

use serde::{Deserialize, Serialize};

use crate::engine::classifier::SignalSet;
use crate::engine::entity::Entity;
use crate::engine::knowledgebase::Knowledgebase;

// ============================================================================
// WEIGHTS
// ============================================================================

/// Known-good file name (exact/prefix/suffix)
pub const NAME_MATCH_WEIGHT: f32 = 0.4;

/// Known-good path segment
pub const FOLDER_MATCH_WEIGHT: f32 = 0.2;

/// Known-good extension
pub const EXTENSION_MATCH_WEIGHT: f32 = 0.2;

/// Install-root marker in the path or caller-supplied context
pub const CONTEXT_MATCH_WEIGHT: f32 = 0.3;

/// Minimum confidence for suppression to take effect. Below this the
/// scoring engine still weighs the confidence as a negative factor.
pub const SUPPRESSION_CONFIDENCE_MIN: f32 = 0.5;

// ============================================================================
// TYPES
// ============================================================================

/// Optional OS-provided context passed in by the orchestrator
#[derive(Debug, Clone, Default)]
pub struct LegitimacyContext {
    /// Extra install-root markers beyond the snapshot's built-ins
    pub install_root_markers: Vec<String>,
    /// Names of related running processes (launcher, game client)
    pub related_processes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuppressionDecision {
    pub suppressed: bool,
    pub confidence: f32,
}

impl SuppressionDecision {
    pub fn none() -> Self {
        Self {
            suppressed: false,
            confidence: 0.0,
        }
    }
}

// ============================================================================
// FILTER
// ============================================================================

/// Evaluate legitimacy signals for one entity
pub fn suppress(
    entity: &Entity,
    signals: &SignalSet,
    snapshot: &Knowledgebase,
    context: &LegitimacyContext,
) -> SuppressionDecision {
    // A hash the staff confirmed legitimate is conclusive on its own
    let confidence = if signals.hash_known_legitimate {
        1.0
    } else {
        accumulate_confidence(entity, snapshot, context)
    };

    let suppressed =
        confidence >= SUPPRESSION_CONFIDENCE_MIN && !signals.has_high_direct_evidence();

    SuppressionDecision {
        suppressed,
        confidence,
    }
}

fn accumulate_confidence(
    entity: &Entity,
    snapshot: &Knowledgebase,
    context: &LegitimacyContext,
) -> f32 {
    let name = entity.file_name();
    let path = entity.normalized_path();
    let mut confidence = 0.0f32;

    if snapshot
        .legitimacy
        .file_names
        .iter()
        .any(|good| name == *good || name.starts_with(good.as_str()) || name.ends_with(good.as_str()))
    {
        confidence += NAME_MATCH_WEIGHT;
    }

    // Segment membership, counted once
    if path
        .split('/')
        .any(|segment| snapshot.legitimacy.folder_names.contains(segment))
    {
        confidence += FOLDER_MATCH_WEIGHT;
    }

    if let Some(ext) = entity.extension() {
        if snapshot.legitimacy.extensions.contains(&ext) {
            confidence += EXTENSION_MATCH_WEIGHT;
        }
    }

    if has_context_signal(&path, snapshot, context) {
        confidence += CONTEXT_MATCH_WEIGHT;
    }

    confidence.clamp(0.0, 1.0)
}

fn has_context_signal(
    path: &str,
    snapshot: &Knowledgebase,
    context: &LegitimacyContext,
) -> bool {
    if snapshot
        .locations
        .install_roots
        .iter()
        .any(|marker| path.contains(marker.as_str()))
    {
        return true;
    }
    if context
        .install_root_markers
        .iter()
        .any(|marker| path.contains(&marker.to_lowercase()))
    {
        return true;
    }
    context.related_processes.iter().any(|proc_name| {
        let lower = proc_name.to_lowercase();
        lower.contains("minecraft") || lower.contains("java") || lower.contains("steam")
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classifier::PatternHit;
    use crate::engine::knowledgebase::RiskCategory;

    fn ctx() -> LegitimacyContext {
        LegitimacyContext::default()
    }

    #[test]
    fn test_known_name_and_folder_suppress() {
        // Name prefix + known-good folder + install root = 0.4+0.2+0.3
        let e = Entity::file(
            "C:\\Program Files (x86)\\Minecraft\\saves\\optifine-installer.jar",
            10,
            None,
        );
        let kb = Knowledgebase::builtin();
        let decision = suppress(&e, &SignalSet::default(), &kb, &ctx());

        assert!(decision.confidence >= 0.5);
        assert!(decision.suppressed);
    }

    #[test]
    fn test_weak_signals_do_not_suppress() {
        // Extension alone: 0.2 < 0.5
        let e = Entity::file("/home/x/notes.txt", 10, None);
        let kb = Knowledgebase::builtin();
        let decision = suppress(&e, &SignalSet::default(), &kb, &ctx());

        assert!(decision.confidence > 0.0);
        assert!(!decision.suppressed);
    }

    #[test]
    fn test_legitimate_hash_is_conclusive() {
        let e = Entity::file("/home/x/downloads/vape.jar", 10, None);
        let kb = Knowledgebase::builtin();
        let signals = SignalSet {
            hash_known_legitimate: true,
            ..Default::default()
        };
        let decision = suppress(&e, &signals, &kb, &ctx());

        assert_eq!(decision.confidence, 1.0);
        assert!(decision.suppressed);
    }

    #[test]
    fn test_high_direct_evidence_overrides_legitimacy() {
        let e = Entity::file(
            "C:\\Program Files\\Minecraft\\saves\\optifine.jar",
            10,
            None,
        );
        let kb = Knowledgebase::builtin();
        let signals = SignalSet {
            content_matches: vec![PatternHit::new("killaura", RiskCategory::High)],
            ..Default::default()
        };
        let decision = suppress(&e, &signals, &kb, &ctx());

        assert!(decision.confidence >= 0.5);
        assert!(!decision.suppressed);
    }

    #[test]
    fn test_caller_context_counts() {
        let e = Entity::file("/opt/launcher/game.jar", 10, None);
        let kb = Knowledgebase::builtin();
        let context = LegitimacyContext {
            install_root_markers: vec!["/opt/launcher".to_string()],
            ..Default::default()
        };
        let decision = suppress(&e, &SignalSet::default(), &kb, &context);

        assert!(decision.confidence >= CONTEXT_MATCH_WEIGHT);
    }
}
