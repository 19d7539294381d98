//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Creates a secure template if missing (unless SETTLE_MOVE_CONFIG is set).
//!
//! Notes:
//! - This module only reads/writes the config file; directory validation
//!   happens in `config::validate`.
//! - Unknown XML fields cause a hard failure (panic) to surface
//!   misconfigurations early.

use anyhow::Result;
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::paths::default_config_path;
use super::types::LogLevel;
use crate::platform::{set_dir_mode_0700, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "watch_base")]
    watch_base: Option<String>,
    #[serde(rename = "landing_base")]
    landing_base: Option<String>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
    /// Optional override of the discovery tick, in seconds
    #[serde(
        rename = "discover_interval_seconds",
        default,
        deserialize_with = "de_u64_trimmed_opt"
    )]
    discover_interval_seconds: Option<u64>,
    /// Optional override of the size-sampling tick, in seconds
    #[serde(
        rename = "settle_interval_seconds",
        default,
        deserialize_with = "de_u64_trimmed_opt"
    )]
    settle_interval_seconds: Option<u64>,
}

/// Settings read from the config file. `None` fields were absent and leave
/// the corresponding Config default untouched.
#[derive(Debug, Default)]
pub struct XmlSettings {
    pub watch_base: Option<PathBuf>,
    pub landing_base: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
    pub discover_interval: Option<Duration>,
    pub settle_interval: Option<Duration>,
}

// Custom deserializer that trims surrounding whitespace for optional u64
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<u64>().ok()))
}

fn non_empty_path(s: Option<String>) -> Option<PathBuf> {
    s.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Read config from XML. SETTLE_MOVE_CONFIG overrides the per-platform
/// default path. Returns None if the file doesn't exist or can't be parsed.
pub fn load_config_from_xml() -> Option<XmlSettings> {
    let cfg_path = default_config_path().ok()?;
    if !cfg_path.exists() {
        return None;
    }

    let content = fs::read_to_string(&cfg_path).ok()?;
    let parsed: XmlConfig = match from_xml_str(&content) {
        Ok(x) => x,
        Err(e) => {
            // Fail hard on unknown field (serde deny_unknown_fields); else,
            // log and return None.
            let msg = e.to_string();
            if msg.contains("unknown field") {
                panic!(
                    "Unknown field in settle_move config {}: {}. Refusing to start.",
                    cfg_path.display(),
                    msg
                );
            }
            debug!(
                "Failed to parse config.xml at {}: {}",
                cfg_path.display(),
                msg
            );
            return None;
        }
    };

    Some(XmlSettings {
        watch_base: non_empty_path(parsed.watch_base),
        landing_base: non_empty_path(parsed.landing_base),
        log_level: parsed.log_level.as_deref().and_then(LogLevel::parse),
        log_file: non_empty_path(parsed.log_file),
        discover_interval: parsed.discover_interval_seconds.map(Duration::from_secs),
        settle_interval: parsed.settle_interval_seconds.map(Duration::from_secs),
    })
}

/// Result of ensuring a config file exists.
#[derive(Debug)]
pub enum LoadResult {
    /// A template was just written at this path; the user should edit it.
    CreatedTemplate(PathBuf),
    /// A config file already exists at this path.
    Existing(PathBuf),
    /// No config path could be determined, or SETTLE_MOVE_CONFIG points at a
    /// missing file (we never create files at explicit locations).
    Unavailable,
}

/// Ensure a default config file exists, writing a template on first run.
/// Explicit SETTLE_MOVE_CONFIG locations are never auto-created.
pub fn load_or_init() -> Result<LoadResult> {
    let Ok(cfg_path) = default_config_path() else {
        return Ok(LoadResult::Unavailable);
    };
    if cfg_path.exists() {
        return Ok(LoadResult::Existing(cfg_path));
    }
    if env::var_os("SETTLE_MOVE_CONFIG").is_some() {
        return Ok(LoadResult::Unavailable);
    }
    create_template_config(&cfg_path)?;
    Ok(LoadResult::CreatedTemplate(cfg_path))
}

/// Create parent directory (0700) and write a small secure template config.
pub fn create_template_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        // Best-effort: ignore permission-setting errors so creation still
        // succeeds on weird filesystems.
        let _ = set_dir_mode_0700(parent);
    }

    let content = "\
<config>
  <!-- Directory watched for newly arrived files (required) -->
  <!-- <watch_base>/srv/intake</watch_base> -->
  <!-- Directory settled files are relocated into (required) -->
  <!-- <landing_base>/srv/landing</landing_base> -->
  <!-- <log_level>normal</log_level> -->
  <!-- <log_file>/var/log/settle_move.log</log_file> -->
  <!-- <discover_interval_seconds>60</discover_interval_seconds> -->
  <!-- <settle_interval_seconds>60</settle_interval_seconds> -->
</config>
";

    write_config_secure_new_0600(path, content.as_bytes())
}
