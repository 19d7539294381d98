//! New-file discovery.
//!
//! Enumerates the watch base on a fixed interval and reports names that were
//! not seen on an earlier tick. Only top-level regular files count; symlinks
//! (including the ones this program leaves behind after a relocation) and
//! directories are ignored. A tracked name whose entry disappears or stops
//! being a regular file is dropped from tracking so a genuine reappearance is
//! reported again.

use crossbeam_channel::Sender;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::shutdown;

/// Membership tracking for file names already reported as new.
///
/// Owned exclusively by the discovery loop; no other component reads or
/// mutates it.
#[derive(Debug, Default)]
pub struct Tracker {
    seen: HashSet<OsString>,
}

impl Tracker {
    /// Start with an empty set, so files already present in the watch base
    /// are reported as new on the first tick (startup catch-up).
    pub fn new() -> Self {
        Self::default()
    }

    /// One discovery tick: list `dir` and return the names of regular files
    /// not seen before, in enumeration order.
    ///
    /// The tracked set is replaced by the set of names currently present as
    /// regular files, which both records the new arrivals and drops names
    /// whose files vanished or became symlinks. On error the set is left
    /// untouched so the next tick retries from the same state.
    pub fn scan(&mut self, dir: &Path) -> io::Result<Vec<OsString>> {
        let mut current = HashSet::new();
        let mut batch = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            // DirEntry::file_type does not follow symlinks, so a symlink to a
            // file is not a regular file here.
            let ftype = entry.file_type()?;
            if !ftype.is_file() {
                continue;
            }
            let name = entry.file_name();
            if !self.seen.contains(&name) {
                batch.push(name.clone());
            }
            current.insert(name);
        }

        self.seen = current;
        Ok(batch)
    }

    /// Whether a name is currently tracked.
    pub fn contains(&self, name: &OsString) -> bool {
        self.seen.contains(name)
    }

    /// Number of names currently tracked.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when no names are tracked.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Perpetual discovery loop: tick, scan, send each non-empty batch downstream.
///
/// Enumeration failures are soft: the tick is skipped (tracked state kept) and
/// the loop retries on the next tick. The loop ends when shutdown is requested
/// or the receiving side of the channel is gone.
pub fn run(watch_base: PathBuf, interval: Duration, batches: Sender<Vec<OsString>>) {
    let mut tracker = Tracker::new();
    loop {
        std::thread::sleep(interval);
        if shutdown::is_requested() {
            debug!("discovery loop stopping: shutdown requested");
            return;
        }
        match tracker.scan(&watch_base) {
            Ok(batch) if !batch.is_empty() => {
                debug!(count = batch.len(), "discovered new files");
                // A full channel blocks here, applying backpressure instead
                // of dropping batches.
                if batches.send(batch).is_err() {
                    return;
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, dir = %watch_base.display(), "failed to enumerate watch base; will retry next tick");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn first_scan_reports_preexisting_files() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("a.txt"), b"a").unwrap();
        fs::write(td.path().join("b.txt"), b"b").unwrap();

        let mut tracker = Tracker::new();
        let mut batch = tracker.scan(td.path()).unwrap();
        batch.sort();
        assert_eq!(batch, vec![OsString::from("a.txt"), OsString::from("b.txt")]);
    }

    #[test]
    fn second_scan_reports_nothing_for_same_files() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("a.txt"), b"a").unwrap();

        let mut tracker = Tracker::new();
        assert_eq!(tracker.scan(td.path()).unwrap().len(), 1);
        assert!(tracker.scan(td.path()).unwrap().is_empty());
    }

    #[test]
    fn directories_are_ignored() {
        let td = tempdir().unwrap();
        fs::create_dir(td.path().join("subdir")).unwrap();

        let mut tracker = Tracker::new();
        assert!(tracker.scan(td.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_ignored() {
        let td = tempdir().unwrap();
        let target = td.path().join("real.txt");
        fs::write(&target, b"x").unwrap();
        std::os::unix::fs::symlink(&target, td.path().join("link.txt")).unwrap();

        let mut tracker = Tracker::new();
        let batch = tracker.scan(td.path()).unwrap();
        assert_eq!(batch, vec![OsString::from("real.txt")]);
    }

    #[test]
    fn removed_file_is_untracked_and_rediscovered() {
        let td = tempdir().unwrap();
        let path = td.path().join("transient.txt");
        fs::write(&path, b"x").unwrap();

        let mut tracker = Tracker::new();
        assert_eq!(tracker.scan(td.path()).unwrap().len(), 1);

        fs::remove_file(&path).unwrap();
        assert!(tracker.scan(td.path()).unwrap().is_empty());
        assert!(!tracker.contains(&OsString::from("transient.txt")));

        // Reappears as a genuine new file: reported again.
        fs::write(&path, b"y").unwrap();
        assert_eq!(tracker.scan(td.path()).unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn file_replaced_by_symlink_is_untracked() {
        // This is what the watch base looks like right after a relocation:
        // the regular file is gone and a symlink sits at its old path.
        let td = tempdir().unwrap();
        let path = td.path().join("moved.txt");
        fs::write(&path, b"x").unwrap();

        let mut tracker = Tracker::new();
        assert_eq!(tracker.scan(td.path()).unwrap().len(), 1);

        fs::remove_file(&path).unwrap();
        std::os::unix::fs::symlink("/elsewhere/moved.txt", &path).unwrap();
        assert!(tracker.scan(td.path()).unwrap().is_empty());
        assert!(!tracker.contains(&OsString::from("moved.txt")));
    }

    #[test]
    fn scan_error_leaves_tracking_untouched() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("a.txt"), b"a").unwrap();

        let mut tracker = Tracker::new();
        assert_eq!(tracker.scan(td.path()).unwrap().len(), 1);

        let missing = td.path().join("no_such_dir");
        assert!(tracker.scan(&missing).is_err());
        assert!(tracker.contains(&OsString::from("a.txt")));
        // Not re-reported once the directory is listable again.
        assert!(tracker.scan(td.path()).unwrap().is_empty());
    }
}
