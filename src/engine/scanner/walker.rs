//! Filesystem traversal. Unreadable directories and vanished entries
//! are logged and skipped, never fatal for the sweep.

use std::path::Path;

use walkdir::WalkDir;

use crate::engine::entity::{self, Entity};

/// Lazily yield file entities under `root`, depth-first
pub fn walk_files(root: &Path) -> impl Iterator<Item = Entity> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|res| match res {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("traversal error: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| match entry.metadata() {
            Ok(meta) => Some(Entity::file(
                entry.path().to_string_lossy().to_string(),
                meta.len(),
                entity::modified_ms_of(&meta),
            )),
            Err(e) => {
                log::debug!("stat failed for {}: {}", entry.path().display(), e);
                None
            }
        })
}

// ============================================================================
// TESTS
// ============================================================================
