//! Windows implementations of platform helpers.
//! POSIX mode bits do not apply here; the helpers keep the same signatures and
//! rely on the default ACLs of the user's profile directories.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Open log file for appending, creating it (and its parent) if missing.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Write config atomically: temp file + flush + rename.
pub fn write_config_secure_new_0600(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("config path has no parent: {}", path.display()))?;
    let tmp = dir.join(format!(".settle_move.config.tmp.{}", std::process::id()));

    let mut f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp)
        .with_context(|| format!("create temp config {}", tmp.display()))?;
    f.write_all(contents)
        .and_then(|()| f.sync_all())
        .with_context(|| format!("write temp config {}", tmp.display()))?;
    drop(f);

    if path.exists() {
        let _ = fs::remove_file(path);
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| {
            format!("rename temp config '{}' -> '{}'", tmp.display(), path.display())
        });
    }
    Ok(())
}

/// No-op on Windows (mode bits are a POSIX concept).
pub fn set_dir_mode_0700(_path: &Path) -> io::Result<()> {
    Ok(())
}
