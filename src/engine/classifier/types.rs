//! Classifier output types.
//!
//! A `SignalSet` is the evidence bundle for one (entity, fingerprint)
//! pair. Produced once, never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::engine::knowledgebase::RiskCategory;

/// One matched pattern with its risk category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternHit {
    pub value: String,
    pub category: RiskCategory,
}

impl PatternHit {
    pub fn new(value: impl Into<String>, category: RiskCategory) -> Self {
        Self {
            value: value.into(),
            category,
        }
    }
}

/// Where the entity lives, per the built-in location lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSuspicion {
    #[default]
    None,
    Medium,
    High,
}

/// All evidence extracted for one entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    /// Name matches, at most one per risk category
    pub name_matches: Vec<PatternHit>,
    /// Parent-path matches, at most one per risk category
    pub path_matches: Vec<PatternHit>,
    /// Distinct patterns found in sampled content (or, for processes,
    /// in the command line)
    pub content_matches: Vec<PatternHit>,
    /// Fraction of sampled bytes with value > 127
    pub obfuscation_ratio: f32,
    pub location: LocationSuspicion,
    pub hash_known_malicious: bool,
    pub hash_known_legitimate: bool,
    /// Set when the entity could not be inspected (unreadable,
    /// vanished). The orchestrator treats this as "skip", never as clean.
    pub inconclusive: bool,
}

impl SignalSet {
    /// All-zero signal set marked inconclusive
    pub fn inconclusive() -> Self {
        Self {
            inconclusive: true,
            ..Default::default()
        }
    }

    pub fn has_location_context(&self) -> bool {
        self.location != LocationSuspicion::None
    }

    fn best_category(hits: &[PatternHit]) -> Option<RiskCategory> {
        for category in [RiskCategory::High, RiskCategory::Medium, RiskCategory::Low] {
            if hits.iter().any(|h| h.category == category) {
                return Some(category);
            }
        }
        None
    }

    pub fn best_name_category(&self) -> Option<RiskCategory> {
        Self::best_category(&self.name_matches)
    }

    pub fn best_path_category(&self) -> Option<RiskCategory> {
        Self::best_category(&self.path_matches)
    }

    pub fn has_high_content_match(&self) -> bool {
        self.content_matches
            .iter()
            .any(|h| h.category == RiskCategory::High)
    }

    /// Direct evidence that known-good metadata must never mask:
    /// a confirmed malicious hash or a high-category byte pattern.
    pub fn has_high_direct_evidence(&self) -> bool {
        self.hash_known_malicious || self.has_high_content_match()
    }
}
