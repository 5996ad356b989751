//! Scanned Entity Model
//!
//! An `Entity` is the identity of one scanned thing (file or running
//! process), immutable for the duration of one classification. The
//! `ContentFingerprint` is its sha256 content digest, computed lazily
//! with a bounded read.

use std::fs::{File, Metadata};
use std::io::{self, Read};
use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Read buffer for streaming file hashing
const HASH_CHUNK_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    File,
    Process,
}

/// One scanned thing. Created per traversal step by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub path: String,
    pub kind: EntityKind,
    pub size: u64,
    /// Modification time, milliseconds since the unix epoch
    pub modified_ms: Option<i64>,
    pub pid: Option<u32>,
    pub command_line: Option<String>,
    pub exe_path: Option<String>,
}

impl Entity {
    pub fn file(path: impl Into<String>, size: u64, modified_ms: Option<i64>) -> Self {
        Self {
            path: path.into(),
            kind: EntityKind::File,
            size,
            modified_ms,
            pid: None,
            command_line: None,
            exe_path: None,
        }
    }

    /// Build a file entity from an on-disk path
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = path.metadata()?;
        Ok(Self::file(
            path.to_string_lossy().to_string(),
            meta.len(),
            modified_ms_of(&meta),
        ))
    }

    pub fn process(
        pid: u32,
        name: impl Into<String>,
        exe_path: Option<String>,
        command_line: Option<String>,
    ) -> Self {
        let name = name.into();
        Self {
            path: exe_path.clone().unwrap_or_else(|| name.clone()),
            kind: EntityKind::Process,
            size: 0,
            modified_ms: None,
            pid: Some(pid),
            command_line,
            exe_path,
        }
    }

    /// Lowercase base name of the entity path
    pub fn file_name(&self) -> String {
        let normalized = self.normalized_path();
        normalized
            .rsplit('/')
            .next()
            .unwrap_or(normalized.as_str())
            .to_string()
    }

    /// Lowercase path with forward slashes, for substring matching
    pub fn normalized_path(&self) -> String {
        self.path.to_lowercase().replace('\\', "/")
    }

    /// Lowercase parent directory portion of the path
    pub fn normalized_parent(&self) -> String {
        let normalized = self.normalized_path();
        match normalized.rfind('/') {
            Some(idx) => normalized[..idx].to_string(),
            None => String::new(),
        }
    }

    /// Lowercase extension including the leading dot
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        name.rfind('.')
            .filter(|&idx| idx > 0 && idx + 1 < name.len())
            .map(|idx| name[idx..].to_string())
    }
}

/// Content digest identifying file content independent of path.
/// `sampled` is set when the file was too large to hash in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFingerprint {
    pub sha256: String,
    pub sampled: bool,
}

/// Milliseconds since the unix epoch from file metadata
pub fn modified_ms_of(meta: &Metadata) -> Option<i64> {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
}

/// Hash up to `ceiling` bytes of a file in streaming chunks
pub fn fingerprint_file(path: &Path, size: u64, ceiling: u64) -> io::Result<ContentFingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK_BYTES];
    let mut remaining = size.min(ceiling);

    while remaining > 0 {
        let want = (remaining as usize).min(buf.len());
        let read = file.read(&mut buf[..want])?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
        remaining -= read as u64;
    }

    Ok(ContentFingerprint {
        sha256: hex::encode(hasher.finalize()),
        sampled: size > ceiling,
    })
}

/// Digest of an in-memory buffer
pub fn fingerprint_bytes(data: &[u8]) -> ContentFingerprint {
    let mut hasher = Sha256::new();
    hasher.update(data);
    ContentFingerprint {
        sha256: hex::encode(hasher.finalize()),
        sampled: false,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalized_path_and_name() {
        let e = Entity::file("C:\\Users\\X\\Downloads\\Vape.jar", 10, None);
        assert_eq!(e.normalized_path(), "c:/users/x/downloads/vape.jar");
        assert_eq!(e.file_name(), "vape.jar");
        assert_eq!(e.normalized_parent(), "c:/users/x/downloads");
        assert_eq!(e.extension(), Some(".jar".to_string()));
    }

    #[test]
    fn test_hidden_file_has_no_extension() {
        let e = Entity::file("/home/x/.bashrc", 1, None);
        assert_eq!(e.extension(), None);
    }

    #[test]
    fn test_fingerprint_matches_in_memory_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.bin");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"some sample content").unwrap();
        drop(f);

        let fp = fingerprint_file(&path, 19, 1024).unwrap();
        let mem = fingerprint_bytes(b"some sample content");
        assert_eq!(fp.sha256, mem.sha256);
        assert!(!fp.sampled);
    }

    #[test]
    fn test_fingerprint_respects_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        std::fs::write(&path, vec![7u8; 4096]).unwrap();

        let sampled = fingerprint_file(&path, 4096, 1024).unwrap();
        assert!(sampled.sampled);
        let head = fingerprint_bytes(&vec![7u8; 1024]);
        assert_eq!(sampled.sha256, head.sha256);
    }
}
