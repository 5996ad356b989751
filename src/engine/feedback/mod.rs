//! Feedback Ingestion
//!
//! Staff review labels a verdict "malicious" or "legitimate". Each
//! record is consumed exactly once and turned into a knowledgebase
//! delta: learned hashes, extracted high-risk keywords, or known-good
//! legitimacy rules. Malformed records are rejected at this boundary
//! with no partial mutation. Ingestion never deletes entries.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::knowledgebase::{
    KnowledgebaseDelta, LearnedHash, LearnedPattern, RiskCategory,
};

/// Confidence assigned to a keyword learned from one confirmation
const LEARNED_PATTERN_CONFIDENCE: f32 = 0.9;

/// Path segments shorter than this carry no legitimacy information
const MIN_FOLDER_SEGMENT_LEN: usize = 4;

/// Cheat vocabulary stems extracted from confirmed-malicious names
static HACK_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(vape|entropy|inject|bypass|killaura|aimbot|triggerbot|reach|velocity|scaffold|fly|xray|ghost|stealth|undetected|sigma|flux|future|astolfo|whiteout|liquidbounce|wurst|impact)\w*\b",
    )
    .expect("valid keyword regex")
});

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumanLabel {
    Malicious,
    Legitimate,
}

/// One human-verified label for a previously produced verdict.
/// Created externally; the core does not retain it after ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub entity_name: String,
    pub entity_path: String,
    /// Lowercase hex sha256 of the labeled file, when available
    pub file_hash: Option<String>,
    pub label: HumanLabel,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn new(
        entity_name: impl Into<String>,
        entity_path: impl Into<String>,
        file_hash: Option<String>,
        label: HumanLabel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity_name: entity_name.into(),
            entity_path: entity_path.into(),
            file_hash,
            label,
            notes: None,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub enum FeedbackError {
    MissingEntity,
    InvalidHash(String),
}

impl std::fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackError::MissingEntity => {
                write!(f, "feedback record has neither entity name nor path")
            }
            FeedbackError::InvalidHash(h) => write!(f, "not a sha256 hex digest: {}", h),
        }
    }
}

impl std::error::Error for FeedbackError {}

// ============================================================================
// INGESTION
// ============================================================================

/// Derive the knowledgebase delta for one feedback record
pub fn ingest(record: &FeedbackRecord) -> Result<KnowledgebaseDelta, FeedbackError> {
    validate(record)?;

    let delta = match record.label {
        HumanLabel::Malicious => malicious_delta(record),
        HumanLabel::Legitimate => legitimate_delta(record),
    };

    log::info!(
        "feedback {} ({:?}): +{} patterns, +{} hashes",
        record.id,
        record.label,
        delta.patterns.len(),
        delta.hashes.len()
    );
    Ok(delta)
}

fn validate(record: &FeedbackRecord) -> Result<(), FeedbackError> {
    if record.entity_name.trim().is_empty() && record.entity_path.trim().is_empty() {
        return Err(FeedbackError::MissingEntity);
    }
    if let Some(hash) = &record.file_hash {
        if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FeedbackError::InvalidHash(hash.clone()));
        }
    }
    Ok(())
}

fn malicious_delta(record: &FeedbackRecord) -> KnowledgebaseDelta {
    let mut delta = KnowledgebaseDelta::default();

    let combined = format!(
        "{} {}",
        record.entity_name.to_lowercase(),
        record.entity_path.to_lowercase()
    );
    let mut stems: Vec<String> = HACK_KEYWORD_RE
        .captures_iter(&combined)
        .map(|caps| caps[1].to_lowercase())
        .collect();
    stems.sort();
    stems.dedup();

    for stem in stems {
        delta.patterns.push(LearnedPattern::learned(
            &stem,
            RiskCategory::High,
            LEARNED_PATTERN_CONFIDENCE,
        ));
    }

    if let Some(hash) = &record.file_hash {
        delta.hashes.push(LearnedHash {
            hash: hash.to_lowercase(),
            is_malicious: true,
            confirmed_count: 1,
            source_feedback_id: Some(record.id),
        });
    }

    delta
}

fn legitimate_delta(record: &FeedbackRecord) -> KnowledgebaseDelta {
    let mut delta = KnowledgebaseDelta::default();

    if let Some(hash) = &record.file_hash {
        delta.hashes.push(LearnedHash {
            hash: hash.to_lowercase(),
            is_malicious: false,
            confirmed_count: 1,
            source_feedback_id: Some(record.id),
        });
    }

    let name = record.entity_name.to_lowercase();
    if !name.is_empty() {
        delta.legitimacy.file_names.insert(name.clone());
        if let Some(idx) = name.rfind('.') {
            if idx > 0 && idx + 1 < name.len() {
                delta.legitimacy.extensions.insert(name[idx..].to_string());
            }
        }
    }

    let path = record.entity_path.to_lowercase().replace('\\', "/");
    for segment in path.split('/') {
        // Skip drive letters and short noise segments
        if segment.len() >= MIN_FOLDER_SEGMENT_LEN && !segment.contains(':') {
            delta.legitimacy.folder_names.insert(segment.to_string());
        }
    }

    delta
}

// ============================================================================
// TESTS
// ============================================================================
