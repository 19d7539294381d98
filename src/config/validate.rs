//! Config validation logic.
//! Verifies directory existence, readability/writability and disjoint paths,
//! and normalizes both bases to absolute canonical paths so the symlinks left
//! behind after relocation stay valid regardless of the working directory.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use crate::utils::is_writable_probe;

use super::types::Config;

/// Validate the configured paths and intervals, then canonicalize both bases
/// in place. Any failure here is fatal: monitoring must not start against a
/// missing or ambiguous directory layout.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    if cfg.watch_base.as_os_str().is_empty() {
        bail!("watch base is required; pass --watch-base or set <watch_base> in config.xml");
    }
    if cfg.landing_base.as_os_str().is_empty() {
        bail!("landing base is required; pass --landing-base or set <landing_base> in config.xml");
    }
    if cfg.discover_interval.is_zero() {
        bail!("discover interval must be at least 1 second");
    }
    if cfg.settle_interval.is_zero() {
        bail!("settle interval must be at least 1 second");
    }

    // 1) Watch base: must exist, be a directory, and be readable.
    ensure_dir_exists_and_is_dir(&cfg.watch_base, "watch_base")?;
    ensure_readable(&cfg.watch_base, "watch_base")?;

    // 2) Landing base: must be a directory; create if missing; ensure writable.
    ensure_dir_is_or_create(&cfg.landing_base, "landing_base")?;
    ensure_writable(&cfg.landing_base, "landing_base")?;

    // 3) Resolve symlinks and make both bases absolute. The relocation stage
    //    builds symlink targets from landing_base, so it must be absolute.
    let wb_real = dunce::canonicalize(&cfg.watch_base)
        .with_context(|| format!("canonicalize watch_base '{}'", cfg.watch_base.display()))?;
    let lb_real = dunce::canonicalize(&cfg.landing_base)
        .with_context(|| format!("canonicalize landing_base '{}'", cfg.landing_base.display()))?;

    // 4) The bases must be disjoint (neither contains the other).
    if wb_real == lb_real {
        bail!(
            "watch_base and landing_base resolve to the same path: '{}'",
            wb_real.display()
        );
    }
    if wb_real.starts_with(&lb_real) {
        bail!(
            "watch_base '{}' must not be inside landing_base '{}'",
            wb_real.display(),
            lb_real.display()
        );
    }
    if lb_real.starts_with(&wb_real) {
        bail!(
            "landing_base '{}' must not be inside watch_base '{}'",
            lb_real.display(),
            wb_real.display()
        );
    }

    cfg.watch_base = wb_real;
    cfg.landing_base = lb_real;

    info!(
        "Config validated: watch='{}' landing='{}' discover_interval={}s settle_interval={}s",
        cfg.watch_base.display(),
        cfg.landing_base.display(),
        cfg.discover_interval.as_secs(),
        cfg.settle_interval.as_secs()
    );
    Ok(())
}

/// Ensure path exists and is a directory; emit clear errors with path context.
fn ensure_dir_exists_and_is_dir(path: &Path, name: &str) -> Result<()> {
    if !path.exists() {
        error!("{name} does not exist: {}", path.display());
        bail!("{name} does not exist: {}", path.display());
    }
    if !path.is_dir() {
        error!("{name} is not a directory: {}", path.display());
        bail!("{name} is not a directory: {}", path.display());
    }
    Ok(())
}

/// Ensure directory is readable by attempting to open its entries.
fn ensure_readable(path: &Path, name: &str) -> Result<()> {
    fs::read_dir(path).with_context(|| {
        format!(
            "Cannot read {name} directory '{}'; check permissions",
            path.display()
        )
    })?;
    debug!("{name} readable: {}", path.display());
    Ok(())
}

/// Ensure directory exists (create if missing). If exists, it must be a directory.
fn ensure_dir_is_or_create(path: &Path, name: &str) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            error!("{name} exists but isn't a directory: {}", path.display());
            bail!("{name} exists but isn't a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create {name} directory '{}'", path.display()))?;
        info!("Created {name} directory: {}", path.display());
    }
    Ok(())
}

/// Ensure directory accepts new files via a create-and-remove probe.
fn ensure_writable(path: &Path, name: &str) -> Result<()> {
    is_writable_probe(path).with_context(|| {
        format!(
            "Cannot write to {name} '{}'; check directory permissions",
            path.display()
        )
    })?;
    debug!("{name} writable: {}", path.display());
    Ok(())
}
