//! Outcome reporting.
//!
//! The pipeline notifies a sink once per finished file; the sink is pure
//! observability and is never consulted for control flow. The production
//! sink logs through `tracing`; tests can supply their own implementation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// One event per completed file.
#[derive(Debug)]
pub enum Outcome {
    /// The file was moved and symlinked successfully.
    Moved { name: OsString, dest: PathBuf },
    /// The file was not (or not provably) relocated. Note that a failure to
    /// create the symlink-back lands here even though the move itself
    /// completed; see the error for the stage that failed.
    Failed { name: OsString, error: anyhow::Error },
}

/// A sink the pipeline notifies with one event per completed file.
pub trait OutcomeSink: Send + Sync {
    fn record(&self, outcome: &Outcome);
}

/// Production sink: structured log events.
#[derive(Debug, Default)]
pub struct TracingSink;

impl OutcomeSink for TracingSink {
    fn record(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Moved { name, dest } => {
                info!(
                    file = %Path::new(name).display(),
                    dest = %dest.display(),
                    "moved complete"
                );
            }
            Outcome::Failed { name, error } => {
                error!(
                    file = %Path::new(name).display(),
                    error = %format!("{error:#}"),
                    "move failed"
                );
            }
        }
    }
}
