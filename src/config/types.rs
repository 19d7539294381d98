//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{DISCOVER_INTERVAL_DEFAULT, SETTLE_INTERVAL_DEFAULT};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration used by the watcher.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory watched for newly arrived files
    pub watch_base: PathBuf,
    /// Final destination for settled files
    pub landing_base: PathBuf,
    /// Seconds between directory enumeration ticks
    pub discover_interval: Duration,
    /// Seconds between size samples while a file settles
    pub settle_interval: Duration,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file (in addition to stderr)
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Both bases are required; empty until the config file or CLI
            // supplies them. validate_and_normalize rejects empty bases.
            watch_base: PathBuf::new(),
            landing_base: PathBuf::new(),
            discover_interval: DISCOVER_INTERVAL_DEFAULT,
            settle_interval: SETTLE_INTERVAL_DEFAULT,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Construct a Config with explicit bases; other fields use defaults.
    pub fn new(watch_base: impl Into<PathBuf>, landing_base: impl Into<PathBuf>) -> Self {
        Self {
            watch_base: watch_base.into(),
            landing_base: landing_base.into(),
            ..Default::default()
        }
    }
}
