//! Typed error definitions for settle_move.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while waiting for a file's size to settle.
#[derive(Debug, Error)]
pub enum SettleError {
    /// The file could not be stat'ed, either on the first sample or any
    /// subsequent one (it vanished or became unreadable).
    #[error("cannot stat '{path}': {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Shutdown was requested while probing; the file was never declared
    /// settled.
    #[error("interrupted while waiting for '{path}' to settle")]
    Interrupted { path: PathBuf },
}

/// Failures of the move-and-symlink sequence.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// The destination path is already occupied. Nothing is touched.
    #[error("cannot move: destination '{0}' already exists")]
    DestinationExists(PathBuf),

    /// The copy fallback failed part-way. The source is left in place; a
    /// partial destination file may remain.
    #[error("copy '{src}' -> '{dest}': {source}")]
    Copy {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The copy completed but the source could not be removed afterwards.
    #[error("remove source '{path}' after copy: {source}")]
    RemoveSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was durably relocated but the symlink back at the vacated
    /// source path could not be created.
    #[error("symlink '{link}' -> '{target}': {source}")]
    Symlink {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}
