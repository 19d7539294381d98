//! Atomic rename helper.
//! - Performs a rename with the raw error preserved for fallback decisions.
//! - On Unix, best-effort fsync of the destination directory after rename.
//!
//! Unlike plain `fs::rename` callers, relocation never wants overwrite
//! semantics; the destination is checked before this is attempted and the
//! copy fallback re-checks via create-exclusive.

use std::fs;
use std::io;
use std::path::Path;

pub(super) fn try_atomic_rename(src: &Path, dst: &Path) -> io::Result<()> {
    fs::rename(src, dst)?;

    // Persist the rename itself (best-effort; a failed fsync must not turn a
    // successful rename into an error).
    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        let _ = fsync_dir(parent);
    }

    Ok(())
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = fs::File::open(dir)?;
    f.sync_all()
}
