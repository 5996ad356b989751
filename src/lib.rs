//! Cheat Scanner - Detection Engine Core
//!
//! Evidence-fusion engine that turns raw signals about a filesystem
//! entity (file or running process) into a calibrated verdict with a
//! numeric 0-100 score:
//! - `engine::knowledgebase` - learned hashes + patterns + legitimacy
//!   rules, published as immutable snapshots
//! - `engine::classifier` - name/path/content/hash signal extraction
//! - `engine::legitimacy` - known-good suppression filter
//! - `engine::scoring` - weighted factor fusion into a Verdict
//! - `engine::cache` - memoized per-file verdicts
//! - `engine::feedback` - staff feedback ingestion into the knowledgebase
//! - `engine::scanner` - bounded worker pool over traversal sources

pub mod constants;
pub mod engine;
