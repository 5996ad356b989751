//! Scoring Weights & Alert Thresholds
//!
//! All policy constants live here, not at call sites, so tuning never
//! touches scoring logic. Values are empirically chosen.

use serde::{Deserialize, Serialize};

use super::types::AlertLevel;

// ============================================================================
// FACTOR WEIGHTS (score points, 0-100 scale)
// ============================================================================

/// High-category pattern in the file name or parent path
pub const NAME_HIGH_WEIGHT: f32 = 50.0;

/// Medium-category pattern. Only counted with a suspicious-location
/// signal, so a bare generic keyword never scores alone.
pub const NAME_MEDIUM_WEIGHT: f32 = 20.0;

/// Low-category pattern, same location gate as medium
pub const NAME_LOW_WEIGHT: f32 = 6.0;

pub const LOCATION_HIGH_WEIGHT: f32 = 20.0;
pub const LOCATION_MEDIUM_WEIGHT: f32 = 10.0;

/// Single content-pattern hit
pub const CONTENT_SINGLE_WEIGHT: f32 = 10.0;

/// Two or more independent content hits corroborate each other
pub const CONTENT_CORROBORATED_WEIGHT: f32 = 30.0;

/// Independent hits required for corroboration
pub const CONTENT_CORROBORATION_MIN: usize = 2;

/// Obfuscation factor, applied above the ratio floor unless the entity
/// is a recognized legitimate binary
pub const OBFUSCATION_WEIGHT: f32 = 15.0;
pub const OBFUSCATION_RATIO_MIN: f32 = 0.3;

/// Staff-confirmed legitimate hash
pub const HASH_LEGITIMATE_WEIGHT: f32 = -40.0;

/// Legitimacy-filter confidence, scaled
pub const LEGITIMACY_SCALE_WEIGHT: f32 = -30.0;

pub const SCORE_MIN: f32 = 0.0;
pub const SCORE_MAX: f32 = 100.0;

// ============================================================================
// ALERT THRESHOLDS
// ============================================================================

/// Alert band cut points. Fixed policy, tunable in one place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub critical: f32,
    pub suspicious: f32,
    pub low_suspicion: f32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            critical: 70.0,
            suspicious: 50.0,
            low_suspicion: 30.0,
        }
    }
}

impl AlertThresholds {
    pub fn level_for(&self, score: f32) -> AlertLevel {
        if score >= self.critical {
            AlertLevel::Critical
        } else if score >= self.suspicious {
            AlertLevel::Suspicious
        } else if score >= self.low_suspicion {
            AlertLevel::LowSuspicion
        } else {
            AlertLevel::Normal
        }
    }
}
