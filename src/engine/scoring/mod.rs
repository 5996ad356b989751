//! Scoring Engine
//!
//! Fuses a `SignalSet` and the legitimacy decision into a `Verdict`.
//! A staff-confirmed malicious hash is definitive and short-circuits
//! every other factor. Otherwise weighted factors are summed, clamped
//! to [0,100] and mapped to an alert band.

pub mod rules;
pub mod types;

use std::collections::BTreeMap;

pub use rules::AlertThresholds;
pub use types::{AlertLevel, FactorKind, Verdict};

use crate::engine::classifier::{LocationSuspicion, SignalSet};
use crate::engine::knowledgebase::RiskCategory;
use crate::engine::legitimacy::SuppressionDecision;
use rules::*;

pub fn score(signals: &SignalSet, suppression: &SuppressionDecision) -> Verdict {
    score_with_thresholds(signals, suppression, &AlertThresholds::default())
}

pub fn score_with_thresholds(
    signals: &SignalSet,
    suppression: &SuppressionDecision,
    thresholds: &AlertThresholds,
) -> Verdict {
    // Confirmed hash: no other factor can add or remove anything
    if signals.hash_known_malicious {
        let mut factors = BTreeMap::new();
        factors.insert(FactorKind::HashMalicious, SCORE_MAX);
        return Verdict {
            score: SCORE_MAX,
            alert_level: AlertLevel::Critical,
            factors,
            suppressed_by_legitimacy: false,
        };
    }

    let mut factors = BTreeMap::new();
    let has_location = signals.has_location_context();

    let name_points = category_points(signals.best_name_category(), has_location);
    if name_points != 0.0 {
        factors.insert(FactorKind::NameMatch, name_points);
    }

    let path_points = category_points(signals.best_path_category(), has_location);
    if path_points != 0.0 {
        factors.insert(FactorKind::PathMatch, path_points);
    }

    let location_points = match signals.location {
        LocationSuspicion::High => LOCATION_HIGH_WEIGHT,
        LocationSuspicion::Medium => LOCATION_MEDIUM_WEIGHT,
        LocationSuspicion::None => 0.0,
    };
    if location_points != 0.0 {
        factors.insert(FactorKind::LocationMatch, location_points);
    }

    let content_hits = signals.content_matches.len();
    let content_points = if content_hits >= CONTENT_CORROBORATION_MIN {
        CONTENT_CORROBORATED_WEIGHT
    } else if content_hits == 1 {
        CONTENT_SINGLE_WEIGHT
    } else {
        0.0
    };
    if content_points != 0.0 {
        factors.insert(FactorKind::ContentMatch, content_points);
    }

    if signals.obfuscation_ratio >= OBFUSCATION_RATIO_MIN && !signals.hash_known_legitimate {
        factors.insert(FactorKind::Obfuscation, OBFUSCATION_WEIGHT);
    }

    if signals.hash_known_legitimate {
        factors.insert(FactorKind::HashLegitimate, HASH_LEGITIMATE_WEIGHT);
    }

    // Direct evidence overrides legitimacy entirely; weak or strong,
    // known-good metadata cannot argue with confirmed byte patterns.
    let legitimacy_applies = !signals.has_high_direct_evidence();
    if legitimacy_applies && suppression.confidence > 0.0 {
        factors.insert(
            FactorKind::Legitimacy,
            LEGITIMACY_SCALE_WEIGHT * suppression.confidence,
        );
    }

    let total: f32 = factors.values().sum();
    let score = total.clamp(SCORE_MIN, SCORE_MAX);

    let mut alert_level = thresholds.level_for(score);
    let suppressed_by_legitimacy = suppression.suppressed && legitimacy_applies;
    if suppressed_by_legitimacy {
        alert_level = alert_level.downgraded();
    }

    Verdict {
        score,
        alert_level,
        factors,
        suppressed_by_legitimacy,
    }
}

fn category_points(category: Option<RiskCategory>, has_location_context: bool) -> f32 {
    match category {
        Some(RiskCategory::High) => NAME_HIGH_WEIGHT,
        Some(RiskCategory::Medium) if has_location_context => NAME_MEDIUM_WEIGHT,
        Some(RiskCategory::Low) if has_location_context => NAME_LOW_WEIGHT,
        _ => 0.0,
    }
}

// ============================================================================
// TESTS
// ============================================================================
