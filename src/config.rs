use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "MINISTRY_BOARD_DIR";
pub const APP_DIR: &str = "ministry-board";
pub const LOG_FILE: &str = "ministry-board.log";

/// Explicit directory if given, else `<platform data dir>/ministry-board`,
/// else `./.ministry-board`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    dirs::data_dir()
        .map(|base| base.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR}")))
}

pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}
