//! Knowledgebase data types.
//!
//! `LearnedPattern` and `LearnedHash` are owned exclusively by the
//! knowledgebase; feedback ingestion is the only writer, everything
//! else reads them through an immutable snapshot.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Risk category of a keyword pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    High,
    Medium,
    Low,
}

/// Keyword pattern, built-in or learned from staff feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedPattern {
    /// Lowercase match value
    pub value: String,
    pub category: RiskCategory,
    /// Confidence in [0,1]
    pub confidence: f32,
    /// How many feedback records contributed this pattern
    pub learned_count: u32,
    pub active: bool,
}

impl LearnedPattern {
    pub fn builtin(value: &str, category: RiskCategory) -> Self {
        Self {
            value: value.to_lowercase(),
            category,
            confidence: 1.0,
            learned_count: 0,
            active: true,
        }
    }

    pub fn learned(value: &str, category: RiskCategory, confidence: f32) -> Self {
        Self {
            value: value.to_lowercase(),
            category,
            confidence,
            learned_count: 1,
            active: true,
        }
    }
}

/// Content hash confirmed by staff feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedHash {
    /// Lowercase hex sha256
    pub hash: String,
    pub is_malicious: bool,
    pub confirmed_count: u32,
    pub source_feedback_id: Option<Uuid>,
}

/// Known-good metadata sets used by the legitimacy filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegitimacyRules {
    /// Lowercase known-good file names (matched exact/prefix/suffix)
    pub file_names: BTreeSet<String>,
    /// Lowercase known-good path segments
    pub folder_names: BTreeSet<String>,
    /// Lowercase known-good extensions, including the leading dot
    pub extensions: BTreeSet<String>,
}

impl LegitimacyRules {
    pub fn is_empty(&self) -> bool {
        self.file_names.is_empty() && self.folder_names.is_empty() && self.extensions.is_empty()
    }

    /// Set union, used when applying a delta
    pub fn merge(&mut self, other: &LegitimacyRules) {
        self.file_names.extend(other.file_names.iter().cloned());
        self.folder_names.extend(other.folder_names.iter().cloned());
        self.extensions.extend(other.extensions.iter().cloned());
    }
}

/// Built-in location suspicion lists. Part of the snapshot so one
/// classification sees one consistent view of all policy data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationRules {
    /// Lowercase path fragments that mark a highly suspicious location
    pub high_suspicion: Vec<String>,
    /// Lowercase path fragments that mark a mildly suspicious location
    pub medium_suspicion: Vec<String>,
    /// Lowercase install-root markers treated as legitimacy context
    pub install_roots: Vec<String>,
}

/// Append-only mutation produced by one feedback ingestion.
/// Applying a delta never deletes anything from the knowledgebase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgebaseDelta {
    pub patterns: Vec<LearnedPattern>,
    pub hashes: Vec<LearnedHash>,
    pub legitimacy: LegitimacyRules,
}

impl KnowledgebaseDelta {
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.hashes.is_empty() && self.legitimacy.is_empty()
    }
}
