//! Pipeline wiring: discovery -> settling -> outcomes.
//!
//! Two worker threads communicate through bounded channels. The discovery
//! thread ticks and sends batches of new names; the prober thread consumes
//! batches, waits for each file to settle (serially within a batch; files are
//! logically independent) and emits exactly one outcome per file. The caller
//! consumes outcomes and performs the relocation.
//!
//! A full channel blocks its producer rather than dropping items, so slow
//! consumers backpressure discovery instead of losing files. No stage has a
//! cancellation mechanism beyond the process-wide shutdown flag.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::debug;

use super::{discover, settle};
use crate::errors::SettleError;

/// Pending items per hand-off queue. Large enough that producers do not stall
/// under normal load.
pub const QUEUE_CAPACITY: usize = 1000;

/// Result of probing one discovered file: either it settled and is safe to
/// move, or stability could not be confirmed.
#[derive(Debug)]
pub struct SettleOutcome {
    /// File name within the watch base.
    pub name: OsString,
    /// Ok when the size held steady across two consecutive samples.
    pub result: Result<(), SettleError>,
}

/// Handles to the running pipeline. Dropping the outcome receiver (or
/// requesting shutdown) winds the worker threads down.
pub struct Pipeline {
    outcomes: Receiver<SettleOutcome>,
    discovery: JoinHandle<()>,
    prober: JoinHandle<()>,
}

impl Pipeline {
    /// Spawn the discovery and prober threads against `watch_base`.
    pub fn spawn(
        watch_base: PathBuf,
        discover_interval: Duration,
        settle_interval: Duration,
    ) -> io::Result<Self> {
        let (batch_tx, batch_rx) = bounded::<Vec<OsString>>(QUEUE_CAPACITY);
        let (outcome_tx, outcome_rx) = bounded::<SettleOutcome>(QUEUE_CAPACITY);

        let discovery = {
            let watch_base = watch_base.clone();
            std::thread::Builder::new()
                .name("discover".into())
                .spawn(move || discover::run(watch_base, discover_interval, batch_tx))?
        };

        let prober = std::thread::Builder::new()
            .name("settle".into())
            .spawn(move || run_prober(watch_base, settle_interval, batch_rx, outcome_tx))?;

        Ok(Self {
            outcomes: outcome_rx,
            discovery,
            prober,
        })
    }

    /// Stream of per-file outcomes. Ends once both workers have stopped and
    /// all pending outcomes were consumed.
    pub fn outcomes(&self) -> &Receiver<SettleOutcome> {
        &self.outcomes
    }

    /// Wait for the worker threads to finish. Call after the outcome stream
    /// ends (i.e. after a shutdown request).
    pub fn join(self) {
        let _ = self.discovery.join();
        let _ = self.prober.join();
    }
}

/// Consume batches of newly discovered names and emit one settle outcome per
/// file. Batches may arrive while a previous batch is still being probed; the
/// only guarantee is per-file ordering (discover before probe), never a global
/// order across files.
fn run_prober(
    watch_base: PathBuf,
    interval: Duration,
    batches: Receiver<Vec<OsString>>,
    outcomes: Sender<SettleOutcome>,
) {
    for batch in batches.iter() {
        for name in batch {
            let path = watch_base.join(&name);
            let result = settle::wait_for_settled(&path, interval);
            if outcomes.send(SettleOutcome { name, result }).is_err() {
                return;
            }
        }
    }
    debug!("prober loop stopping: discovery channel closed");
}
