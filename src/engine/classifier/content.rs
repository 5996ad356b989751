//! Bounded Content Inspection
//!
//! Reads up to a configured window from the head of a file and scans
//! the raw bytes: case-insensitive pattern substrings plus the
//! obfuscation ratio (fraction of bytes above 0x7f). No format parsing,
//! no disassembly.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::types::PatternHit;
use crate::engine::knowledgebase::Knowledgebase;

/// Result of scanning one sampled window
#[derive(Debug, Clone, Default)]
pub struct ContentScan {
    pub matches: Vec<PatternHit>,
    pub obfuscation_ratio: f32,
}

/// Read up to `max_bytes` from the head of the file
pub fn read_sample(path: &Path, max_bytes: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut data = Vec::new();
    file.take(max_bytes as u64).read_to_end(&mut data)?;
    Ok(data)
}

/// Scan raw bytes against every active pattern. Each pattern counts at
/// most once; distinct patterns are independent hits.
pub fn scan_bytes(data: &[u8], snapshot: &Knowledgebase) -> ContentScan {
    let mut matches = Vec::new();

    for pattern in snapshot.all_active_patterns() {
        if pattern.value.len() < 3 {
            // Two-byte fragments match almost anything in binary data
            continue;
        }
        if contains_ci(data, pattern.value.as_bytes()) {
            matches.push(PatternHit::new(pattern.value.clone(), pattern.category));
        }
    }

    ContentScan {
        matches,
        obfuscation_ratio: obfuscation_ratio(data),
    }
}

/// Fraction of bytes with value > 127 within the window
pub fn obfuscation_ratio(data: &[u8]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let high = data.iter().filter(|&&b| b > 127).count();
    high as f32 / data.len() as f32
}

/// ASCII case-insensitive substring search
fn contains_ci(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.len() < needle.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|w| w.eq_ignore_ascii_case(needle))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::knowledgebase::RiskCategory;

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci(b"loading KillAura module", b"killaura"));
        assert!(contains_ci(b"VAPE", b"vape"));
        assert!(!contains_ci(b"legit mod", b"killaura"));
        assert!(!contains_ci(b"ka", b"killaura"));
    }

    #[test]
    fn test_scan_finds_distinct_patterns_once() {
        let kb = Knowledgebase::builtin();
        let data = b"vape vape vape and also a KillAura switch";
        let scan = scan_bytes(data, &kb);

        let vape_hits = scan.matches.iter().filter(|h| h.value == "vape").count();
        assert_eq!(vape_hits, 1);
        assert!(scan
            .matches
            .iter()
            .any(|h| h.value == "killaura" && h.category == RiskCategory::High));
    }

    #[test]
    fn test_obfuscation_ratio() {
        assert_eq!(obfuscation_ratio(b""), 0.0);
        assert_eq!(obfuscation_ratio(b"plain ascii"), 0.0);

        let packed: Vec<u8> = (0..100u8).map(|i| if i < 60 { 0xee } else { 0x20 }).collect();
        let ratio = obfuscation_ratio(&packed);
        assert!(ratio > 0.55 && ratio < 0.65);
    }

    #[test]
    fn test_read_sample_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        std::fs::write(&path, vec![0u8; 4096]).unwrap();

        let sample = read_sample(&path, 1000).unwrap();
        assert_eq!(sample.len(), 1000);
    }
}
