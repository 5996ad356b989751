//! Process Command-Line Inspection
//!
//! Java cheat clients inject through `-javaagent:` or bootclasspath
//! overrides. The command line is the process-kind equivalent of file
//! content, so hits here land in `SignalSet::content_matches`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::PatternHit;
use crate::engine::knowledgebase::{Knowledgebase, RiskCategory};

static JAVA_AGENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)-javaagent:(\S+)").expect("valid javaagent regex"));

const BOOTCLASSPATH_MARKER: &str = "-xbootclasspath";

/// Scan one command line for injection markers and active patterns
pub fn scan_command_line(command_line: &str, snapshot: &Knowledgebase) -> Vec<PatternHit> {
    let lower = command_line.to_lowercase();
    let mut hits: Vec<PatternHit> = Vec::new();

    for caps in JAVA_AGENT_RE.captures_iter(command_line) {
        let agent_path = caps[1].to_lowercase();
        let known_cheat = snapshot
            .active_patterns(RiskCategory::High)
            .find(|p| agent_path.contains(&p.value));

        match known_cheat {
            // Agent named after a known cheat is direct evidence
            Some(pattern) => hits.push(PatternHit::new(pattern.value.clone(), RiskCategory::High)),
            None => hits.push(PatternHit::new("javaagent", RiskCategory::Medium)),
        }
    }

    if lower.contains(BOOTCLASSPATH_MARKER) {
        hits.push(PatternHit::new("bootclasspath", RiskCategory::Medium));
    }

    // Plain pattern sweep over the rest of the command line
    for pattern in snapshot.all_active_patterns() {
        if pattern.value.len() < 3 {
            continue;
        }
        if lower.contains(&pattern.value) && !hits.iter().any(|h| h.value == pattern.value) {
            hits.push(PatternHit::new(pattern.value.clone(), pattern.category));
        }
    }

    hits
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_cheat_agent_is_high() {
        let kb = Knowledgebase::builtin();
        let hits = scan_command_line(
            "java -javaagent:C:\\Temp\\vape.jar -jar minecraft.jar",
            &kb,
        );
        assert!(hits
            .iter()
            .any(|h| h.value == "vape" && h.category == RiskCategory::High));
    }

    #[test]
    fn test_unknown_agent_is_medium() {
        let kb = Knowledgebase::builtin();
        let hits = scan_command_line("java -javaagent:/opt/profiler.jar -jar app.jar", &kb);
        assert!(hits
            .iter()
            .any(|h| h.value == "javaagent" && h.category == RiskCategory::Medium));
        assert!(!hits.iter().any(|h| h.category == RiskCategory::High));
    }

    #[test]
    fn test_bootclasspath_marker() {
        let kb = Knowledgebase::builtin();
        let hits = scan_command_line("java -Xbootclasspath/a:patch.jar -jar game.jar", &kb);
        assert!(hits.iter().any(|h| h.value == "bootclasspath"));
    }

    #[test]
    fn test_clean_command_line() {
        let kb = Knowledgebase::builtin();
        let hits = scan_command_line("java -Xmx4G -jar server.jar nogui", &kb);
        assert!(hits.is_empty());
    }
}
