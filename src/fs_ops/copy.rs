//! Streaming copy fallback for cross-filesystem moves.
//!
//! Notes:
//! - The destination is created with `create_new(true)` (O_EXCL semantics) so
//!   an occupant that appeared after the caller's existence check still fails
//!   the move instead of being clobbered.
//! - The copy writes directly to the final destination path; a failure
//!   part-way leaves a partial destination file behind and the source intact.
//!   Callers surface the error, nothing is cleaned up automatically.
//! - Buffered I/O with large (1 MiB) buffers to reduce syscall count, fsync
//!   on completion.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::errors::RelocateError;

const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` to `dest` then remove `src`. The non-atomic window is
/// both-places, never neither: the source is only deleted after the
/// destination is fully written and synced.
pub(super) fn copy_then_remove(src: &Path, dest: &Path) -> Result<(), RelocateError> {
    copy_streaming(src, dest).map_err(|source| RelocateError::Copy {
        src: src.to_path_buf(),
        dest: dest.to_path_buf(),
        source,
    })?;

    fs::remove_file(src).map_err(|source| RelocateError::RemoveSource {
        path: src.to_path_buf(),
        source,
    })
}

/// Copy `src` -> `dst` using buffered I/O, then fsync the destination.
/// Returns the number of bytes written.
fn copy_streaming(src: &Path, dst: &Path) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copy_small_file_ok() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src.txt");
        let dst_path = dir.path().join("dst.txt");

        let data = b"hello world";
        fs::write(&src_path, data).unwrap();

        let n = copy_streaming(&src_path, &dst_path).unwrap();
        assert_eq!(n, data.len() as u64);

        let got = fs::read(&dst_path).unwrap();
        assert_eq!(&got, data);
    }

    #[test]
    fn copy_zero_length_ok() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("empty");
        let dst_path = dir.path().join("out");
        File::create(&src_path).unwrap(); // empty file

        let n = copy_streaming(&src_path, &dst_path).unwrap();
        assert_eq!(n, 0);
        let meta = fs::metadata(&dst_path).unwrap();
        assert_eq!(meta.len(), 0);
    }

    #[test]
    fn fails_if_dest_exists() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src");
        let dst_path = dir.path().join("dst");
        fs::write(&src_path, b"data").unwrap();
        fs::write(&dst_path, b"x").unwrap();

        let err = copy_streaming(&src_path, &dst_path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn large_file_copy_boundary() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("big.bin");
        let dst = dir.path().join("big.out");

        // Size > 2 * BUF_SIZE + 123 to cross multiple buffer boundaries
        let size = 2 * BUF_SIZE + 123;
        let mut data = vec![0u8; size];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 251) as u8; // pseudo pattern
        }
        fs::write(&src, &data).unwrap();

        let n = copy_streaming(&src, &dst).unwrap();
        assert_eq!(n as usize, size);

        let out = fs::read(&dst).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn remove_source_happens_after_copy() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.txt");
        let dst = dir.path().join("b.txt");
        fs::write(&src, b"payload").unwrap();

        copy_then_remove(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn failed_copy_keeps_source() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("keep.txt");
        let dst = dir.path().join("occupied.txt");
        fs::write(&src, b"keep me").unwrap();
        fs::write(&dst, b"occupant").unwrap();

        let err = copy_then_remove(&src, &dst).unwrap_err();
        assert!(matches!(err, RelocateError::Copy { .. }));
        assert!(src.exists(), "source must survive a failed copy");
        assert_eq!(fs::read(&dst).unwrap(), b"occupant");
    }
}
