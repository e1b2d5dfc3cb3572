//! Helpers shared by the engine integration tests

use agent_bootstrap::platform::{library_extension, library_prefix};
use std::path::{Path, PathBuf};

/// Locate the crate's own cdylib under target/<profile>
///
/// It exports `Agent_OnLoad`, so it stands in for a well-formed native agent.
/// `None` when it has not been built next to the test binary.
pub fn own_cdylib() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let deps = exe.parent()?.to_path_buf();
    let profile = deps.parent()?.to_path_buf();

    [profile, deps].iter().find_map(|dir| find_cdylib_in(dir))
}

fn find_cdylib_in(dir: &Path) -> Option<PathBuf> {
    let stem = format!("{}agent_bootstrap", library_prefix());
    std::fs::read_dir(dir).ok()?.flatten().map(|e| e.path()).find(|path| {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        name.starts_with(&stem) && path.extension().and_then(|e| e.to_str()) == Some(library_extension())
    })
}
