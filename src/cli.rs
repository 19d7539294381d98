//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - CLI flags override config file values (loaded from XML if present).
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::types::{Config, LogLevel};

/// Watch a directory and relocate files once their size settles.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Watch a directory and relocate files once their size settles, leaving symlinks behind"
)]
pub struct Args {
    /// Directory to watch for newly arrived files.
    #[arg(long, short = 'w', value_hint = ValueHint::DirPath, help = "Directory to watch for new files")]
    pub watch_base: Option<PathBuf>,

    /// Directory settled files are relocated into.
    #[arg(long, short = 'l', value_hint = ValueHint::DirPath, help = "Directory to relocate settled files into")]
    pub landing_base: Option<PathBuf>,

    /// Seconds between discovery ticks (directory enumeration).
    #[arg(
        long,
        value_name = "SECS",
        help = "Seconds between checks for new files (default 60)"
    )]
    pub discover_interval: Option<u64>,

    /// Seconds between size samples while waiting for a file to settle.
    #[arg(
        long,
        value_name = "SECS",
        help = "Seconds between file size samples (default 60)"
    )]
    pub settle_interval: Option<u64>,

    /// Log to this file in addition to stderr.
    #[arg(long, value_hint = ValueHint::FilePath, help = "Log to this file in addition to stderr")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Print where settle_move will look for the config file, then exit.
    #[arg(
        long,
        help = "Print the config file location used by settle_move and exit"
    )]
    pub print_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(wb) = &self.watch_base {
            cfg.watch_base = wb.clone();
        }
        if let Some(lb) = &self.landing_base {
            cfg.landing_base = lb.clone();
        }
        if let Some(secs) = self.discover_interval {
            cfg.discover_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.settle_interval {
            cfg.settle_interval = Duration::from_secs(secs);
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
