//! Verdict types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Alert band of a verdict, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Normal,
    LowSuspicion,
    Suspicious,
    Critical,
}

impl AlertLevel {
    /// One band down, floored at Normal
    pub fn downgraded(self) -> Self {
        match self {
            AlertLevel::Critical => AlertLevel::Suspicious,
            AlertLevel::Suspicious => AlertLevel::LowSuspicion,
            AlertLevel::LowSuspicion | AlertLevel::Normal => AlertLevel::Normal,
        }
    }
}

/// Closed set of scoring factors, so the weighting table is exhaustive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    NameMatch,
    PathMatch,
    LocationMatch,
    ContentMatch,
    Obfuscation,
    HashMalicious,
    HashLegitimate,
    Legitimacy,
}

/// Final fused output for one entity. Immutable; cached for files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Confidence score in [0,100]
    pub score: f32,
    pub alert_level: AlertLevel,
    /// Contribution of each factor that fired
    pub factors: BTreeMap<FactorKind, f32>,
    pub suppressed_by_legitimacy: bool,
}

impl Verdict {
    pub fn is_flagged(&self) -> bool {
        self.alert_level > AlertLevel::Normal
    }
}
