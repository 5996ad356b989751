//! Knowledgebase Persistence
//!
//! JSON load/save of the learned snapshot. Load failure is never
//! fatal: the caller falls back to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use super::Knowledgebase;
use crate::constants;

#[derive(Debug)]
pub enum KnowledgebaseError {
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for KnowledgebaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgebaseError::IoError(e) => write!(f, "IO Error: {}", e),
            KnowledgebaseError::SerializationError(e) => write!(f, "Serialization Error: {}", e),
            KnowledgebaseError::Invalid(msg) => write!(f, "Invalid knowledgebase: {}", msg),
        }
    }
}

impl std::error::Error for KnowledgebaseError {}

impl From<std::io::Error> for KnowledgebaseError {
    fn from(err: std::io::Error) -> Self {
        KnowledgebaseError::IoError(err)
    }
}

impl From<serde_json::Error> for KnowledgebaseError {
    fn from(err: serde_json::Error) -> Self {
        KnowledgebaseError::SerializationError(err)
    }
}

/// Default on-disk location of the learned snapshot
pub fn default_knowledgebase_path() -> PathBuf {
    constants::get_data_dir().join("knowledgebase_v1.json")
}

/// Save a snapshot to disk
pub fn save_knowledgebase(kb: &Knowledgebase, path: &Path) -> Result<(), KnowledgebaseError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(kb)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a snapshot from disk with validation
pub fn load_knowledgebase(path: &Path) -> Result<Knowledgebase, KnowledgebaseError> {
    if !path.exists() {
        return Err(KnowledgebaseError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Knowledgebase file not found",
        )));
    }

    let data = fs::read(path)?;
    let kb: Knowledgebase = serde_json::from_slice(&data)?;
    validate_knowledgebase(&kb)?;
    Ok(kb)
}

/// Reject snapshots that would cripple the classifier
pub fn validate_knowledgebase(kb: &Knowledgebase) -> Result<(), KnowledgebaseError> {
    if kb.version == 0 {
        return Err(KnowledgebaseError::Invalid("version must be >= 1".into()));
    }
    if kb.patterns.is_empty() {
        return Err(KnowledgebaseError::Invalid("no patterns present".into()));
    }
    for pattern in &kb.patterns {
        if pattern.value.is_empty() {
            return Err(KnowledgebaseError::Invalid("empty pattern value".into()));
        }
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
