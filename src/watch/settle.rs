//! Size-settling detection.
//!
//! A file counts as fully written once two consecutive size samples, taken one
//! interval apart, agree. No OS event reliably signals "the writer is done",
//! so sampling is the contract with the producer: the tradeoff is at least one
//! full interval of added latency per file.

use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::trace;

use crate::errors::SettleError;
use crate::shutdown;

/// Block until `path`'s size is unchanged between two consecutive samples.
///
/// The initial sample is taken immediately; failure to stat at any point
/// (the file vanished or became unreadable) aborts with [`SettleError::Stat`].
/// There is no upper bound on the wait: a file that keeps growing is probed
/// indefinitely. A file that was already complete settles after exactly one
/// interval. Shutdown requests end the wait with [`SettleError::Interrupted`].
pub fn wait_for_settled(path: &Path, interval: Duration) -> Result<(), SettleError> {
    let mut last_size = sample_size(path)?;
    loop {
        if shutdown::is_requested() {
            return Err(SettleError::Interrupted {
                path: path.to_path_buf(),
            });
        }
        std::thread::sleep(interval);
        let size = sample_size(path)?;
        trace!(path = %path.display(), last_size, size, "size sample");
        if size == last_size {
            return Ok(());
        }
        last_size = size;
    }
}

/// One size sample via lstat. Symlink semantics match discovery: we measure
/// the entry at the path itself, never a link target.
fn sample_size(path: &Path) -> Result<u64, SettleError> {
    fs::symlink_metadata(path)
        .map(|m| m.len())
        .map_err(|source| SettleError::Stat {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::time::Instant;
    use tempfile::tempdir;

    const TICK: Duration = Duration::from_millis(25);

    #[test]
    fn finished_file_settles_after_one_interval() {
        let td = tempdir().unwrap();
        let path = td.path().join("done.txt");
        fs::write(&path, b"finished").unwrap();

        let start = Instant::now();
        wait_for_settled(&path, TICK).expect("unchanged file should settle");
        assert!(start.elapsed() >= TICK, "must wait at least one interval");
    }

    #[test]
    fn missing_file_fails_immediately() {
        let td = tempdir().unwrap();
        let err = wait_for_settled(&td.path().join("gone.txt"), TICK).unwrap_err();
        match err {
            SettleError::Stat { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected stat error, got {other:?}"),
        }
    }

    #[test]
    fn growing_file_does_not_settle_until_growth_stops() {
        let td = tempdir().unwrap();
        let path = td.path().join("growing.bin");
        fs::write(&path, b"01234").unwrap();

        let writer_path = path.clone();
        let writer = std::thread::spawn(move || {
            // Keep the file growing for several sample intervals, then stop.
            for _ in 0..6 {
                let mut f = OpenOptions::new().append(true).open(&writer_path).unwrap();
                f.write_all(&[0u8; 32]).unwrap();
                f.sync_all().unwrap();
                std::thread::sleep(TICK / 2);
            }
        });

        let start = Instant::now();
        wait_for_settled(&path, TICK).expect("file settles once growth stops");
        // Growth lasted ~3 intervals; settling cannot have finished within one.
        assert!(
            start.elapsed() >= 2 * TICK,
            "settled too early: {:?}",
            start.elapsed()
        );
        writer.join().unwrap();
    }

    #[test]
    fn file_deleted_mid_probe_reports_stat_error() {
        let td = tempdir().unwrap();
        let path = td.path().join("vanishing.txt");
        fs::write(&path, b"x").unwrap();

        let remover_path = path.clone();
        let remover = std::thread::spawn(move || {
            std::thread::sleep(TICK / 2);
            fs::remove_file(&remover_path).unwrap();
        });

        let err = wait_for_settled(&path, TICK).unwrap_err();
        assert!(matches!(err, SettleError::Stat { .. }));
        remover.join().unwrap();
    }
}
