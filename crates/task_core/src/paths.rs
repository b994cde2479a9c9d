//! Application data directory resolution.

use std::path::PathBuf;

/// Directory holding the persisted session and optional `config.json`.
///
/// `TASK_MANAGER_DATA_DIR` overrides the default of `~/.task_manager`.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("TASK_MANAGER_DATA_DIR") {
        return PathBuf::from(dir);
    }
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(".task_manager")
}
