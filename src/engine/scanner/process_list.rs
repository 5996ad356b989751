//! Running process enumeration via sysinfo

use sysinfo::System;

use crate::engine::entity::Entity;

/// Snapshot of the running process table as scannable entities
pub fn list_processes() -> Vec<Entity> {
    let sys = System::new_all();

    sys.processes()
        .iter()
        .map(|(pid, proc_)| {
            let exe = proc_.exe().map(|p| p.to_string_lossy().to_string());
            let cmd = proc_.cmd();
            let command_line = if cmd.is_empty() {
                None
            } else {
                Some(cmd.join(" "))
            };
            Entity::process(pid.as_u32(), proc_.name(), exe, command_line)
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
