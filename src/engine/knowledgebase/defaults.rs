//! Built-in Pattern Defaults
//!
//! Initial keyword patterns, known-good sets and location lists the
//! engine ships with. Learned entries from staff feedback extend these
//! at runtime; they are never removed.

use super::types::{LearnedPattern, LegitimacyRules, LocationRules, RiskCategory};
use super::Knowledgebase;
use std::collections::HashMap;

// ============================================================================
// KEYWORD PATTERNS
// ============================================================================

/// Known cheat clients and module names. A match here is direct evidence.
pub const HIGH_RISK_PATTERNS: &[&str] = &[
    "vape",
    "killaura",
    "aimbot",
    "triggerbot",
    "reach",
    "velocity",
    "antiknockback",
    "scaffold",
    "xray",
    "fullbright",
    "nofall",
    "speedhack",
    "autoclicker",
    "inject",
    "bypass",
    "stealth",
    "undetected",
    "incognito",
    "liquidbounce",
    "wurst",
    "impact",
    "sigma",
    "flux",
    "future",
    "astolfo",
    "exhibition",
    "novoline",
    "whiteout",
];

/// Generic cheat vocabulary. Only scored with location context.
pub const MEDIUM_RISK_PATTERNS: &[&str] = &[
    "ghost",
    "hackclient",
    "cheatclient",
    "injector",
    "dllinject",
];

/// Very generic words. Only scored with location context, tiny weight.
pub const LOW_RISK_PATTERNS: &[&str] = &["hack", "cheat", "client", "mod"];

// ============================================================================
// KNOWN-GOOD SETS
// ============================================================================

/// Well-known legitimate mods, launchers and tools
pub const LEGITIMATE_NAMES: &[&str] = &[
    "optifine",
    "forge",
    "fabric",
    "iris",
    "sodium",
    "lithium",
    "phosphor",
    "jei",
    "rei",
    "jade",
    "worldedit",
    "worldguard",
    "essentials",
    "luckperms",
    "curseforge",
    "modrinth",
    "lunar",
    "badlion",
    "tlauncher",
    "prism",
    "multimc",
];

/// Path segments that belong to legitimate installs
pub const KNOWN_GOOD_FOLDERS: &[&str] = &[
    "program files",
    "program files (x86)",
    "system32",
    "resourcepacks",
    "shaderpacks",
    "saves",
    "screenshots",
    "logs",
];

/// Extensions of data files that are not executable payloads.
/// Deliberately excludes .jar and .dll.
pub const KNOWN_GOOD_EXTENSIONS: &[&str] = &[
    ".txt",
    ".json",
    ".png",
    ".cfg",
    ".toml",
    ".properties",
    ".log",
    ".nbt",
];

// ============================================================================
// LOCATION LISTS
// ============================================================================

/// Path fragments where cheats usually land
pub const SUSPICIOUS_LOCATIONS_HIGH: &[&str] = &[
    "mods/vape",
    "mods/entropy",
    "mods/sigma",
    "mods/flux",
    "versions/vape",
    "temp",
    "downloads",
    "desktop",
    "appdata/local/temp",
];

/// Path fragments that are only mildly unusual on their own
pub const SUSPICIOUS_LOCATIONS_MEDIUM: &[&str] = &["mods", "versions", "appdata", "roaming"];

/// Install roots used as legitimacy context
pub const INSTALL_ROOT_MARKERS: &[&str] = &[
    "program files",
    "program files (x86)",
    "appdata/local/programs",
    "steam",
    "epic games",
];

// ============================================================================
// ASSEMBLY
// ============================================================================

/// The knowledgebase the engine starts from when no learned data is
/// available (first run, or corrupt learned-data file).
pub fn builtin_knowledgebase() -> Knowledgebase {
    let mut patterns = Vec::new();
    for value in HIGH_RISK_PATTERNS {
        patterns.push(LearnedPattern::builtin(value, RiskCategory::High));
    }
    for value in MEDIUM_RISK_PATTERNS {
        patterns.push(LearnedPattern::builtin(value, RiskCategory::Medium));
    }
    for value in LOW_RISK_PATTERNS {
        patterns.push(LearnedPattern::builtin(value, RiskCategory::Low));
    }

    let mut legitimacy = LegitimacyRules::default();
    for name in LEGITIMATE_NAMES {
        legitimacy.file_names.insert((*name).to_string());
    }
    for folder in KNOWN_GOOD_FOLDERS {
        legitimacy.folder_names.insert((*folder).to_string());
    }
    for ext in KNOWN_GOOD_EXTENSIONS {
        legitimacy.extensions.insert((*ext).to_string());
    }

    let locations = LocationRules {
        high_suspicion: SUSPICIOUS_LOCATIONS_HIGH
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        medium_suspicion: SUSPICIOUS_LOCATIONS_MEDIUM
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        install_roots: INSTALL_ROOT_MARKERS
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    };

    Knowledgebase {
        version: 1,
        patterns,
        hashes: HashMap::new(),
        legitimacy,
        locations,
    }
}
