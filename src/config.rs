//! Config module (modularized).
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use validate::validate_and_normalize;
pub use xml::{LoadResult, create_template_config, load_config_from_xml, load_or_init};

/// Defaults shared across submodules.
pub const DISCOVER_INTERVAL_DEFAULT: std::time::Duration = std::time::Duration::from_secs(60);
pub const SETTLE_INTERVAL_DEFAULT: std::time::Duration = std::time::Duration::from_secs(60);
