//! Data directory resolution.
//!
//! In portable mode (a `portable.txt` marker next to the executable) data
//! lives in a `data/` folder beside the binary; otherwise under
//! `~/.docushuttle/data`.

use std::path::{Path, PathBuf};

pub const PORTABLE_MARKER: &str = "portable.txt";
pub const DATABASE_FILE: &str = "docushuttle.db";
pub const FORWARD_LOG_FILE: &str = "forwarded_emails.log";

/// Returns the data directory for an executable living in `exe_dir`.
pub fn data_dir_for(exe_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = exe_dir {
        if dir.join(PORTABLE_MARKER).exists() {
            return Some(dir.join("data"));
        }
    }
    dirs::home_dir().map(|h| h.join(".docushuttle").join("data"))
}

pub fn default_data_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok();
    data_dir_for(exe.as_deref().and_then(Path::parent))
}
