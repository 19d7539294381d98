//! Relocation of a settled file: move into the landing directory, then leave
//! a symlink at the vacated source path.
//!
//! Order of operations:
//! 1. Refuse if the destination path is occupied (no overwrite, ever).
//! 2. Atomic rename; cheap and atomic when both paths share a filesystem.
//! 3. On rename failure (typically EXDEV across filesystems), stream-copy to
//!    the destination and remove the source afterwards. The file transiently
//!    exists in both places during the copy, never in neither.
//! 4. Symlink the old path to the absolute destination path. A symlink
//!    failure is reported as a relocation failure even though the move itself
//!    already completed durably.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::RelocateError;

use super::atomic::try_atomic_rename;
use super::copy::copy_then_remove;

/// Move `src` to `dest` and symlink `src` -> absolute `dest`.
pub fn relocate_file(src: &Path, dest: &Path) -> Result<(), RelocateError> {
    // lstat so an occupying broken symlink also counts as "exists".
    if fs::symlink_metadata(dest).is_ok() {
        return Err(RelocateError::DestinationExists(dest.to_path_buf()));
    }

    match try_atomic_rename(src, dest) {
        Ok(()) => {
            debug!(src = %src.display(), dest = %dest.display(), "renamed file atomically");
        }
        Err(e) => {
            warn!(error = %e, hint = rename_failure_hint(&e), "atomic rename failed, falling back to copy+remove");
            copy_then_remove(src, dest)?;
            debug!(src = %src.display(), dest = %dest.display(), "copied file and removed source");
        }
    }

    link_back(src, dest)
}

/// Create the symlink at the vacated source path. The target is made absolute
/// so the link stays valid regardless of any process's working directory.
fn link_back(src: &Path, dest: &Path) -> Result<(), RelocateError> {
    let target = absolute_target(dest).map_err(|source| RelocateError::Symlink {
        link: src.to_path_buf(),
        target: dest.to_path_buf(),
        source,
    })?;

    symlink_file(&target, src).map_err(|source| RelocateError::Symlink {
        link: src.to_path_buf(),
        target,
        source,
    })
}

fn absolute_target(dest: &Path) -> io::Result<PathBuf> {
    if dest.is_absolute() {
        Ok(dest.to_path_buf())
    } else {
        std::path::absolute(dest)
    }
}

#[cfg(unix)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_file(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(unix)]
fn rename_failure_hint(e: &io::Error) -> &'static str {
    match e.raw_os_error() {
        Some(code) if code == libc::EXDEV => "cross-filesystem; will copy instead",
        Some(code) if code == libc::EACCES || code == libc::EPERM => {
            "permission denied; check destination perms"
        }
        _ => "falling back to copy",
    }
}

#[cfg(not(unix))]
fn rename_failure_hint(e: &io::Error) -> &'static str {
    match e.kind() {
        io::ErrorKind::PermissionDenied => "permission denied; check destination perms",
        _ => "falling back to copy",
    }
}
