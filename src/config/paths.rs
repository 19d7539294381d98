//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths and detects symlinked ancestors
//! for safety.

use anyhow::{Result, anyhow};
use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file path: $SETTLE_MOVE_CONFIG if set, else the OS-appropriate
/// default under the user's config directory.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(explicit) = env::var_os("SETTLE_MOVE_CONFIG") {
        return Ok(PathBuf::from(explicit));
    }
    let base = config_dir().ok_or_else(|| anyhow!("could not determine a config directory"))?;
    Ok(base.join("settle_move").join("config.xml"))
}

/// OS-appropriate default log file path (data dir).
pub fn default_log_path() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| anyhow!("could not determine a data directory"))?;
    Ok(base.join("settle_move").join("settle_move.log"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
