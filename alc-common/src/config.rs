//! Configuration loading and dataset root resolution
//!
//! Bootstrap configuration comes from an optional TOML file. A missing file
//! is not fatal: built-in defaults are used and the returned [`ConfigSource`]
//! says so, for the caller to log once its subscriber is installed.
//!
//! # Dataset Root Priority
//!
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`ALC_DATASET_ROOT`)
//! 3. TOML config file (`dataset_root`)
//!
//! There is no compiled default for the dataset root; a corpus location must
//! be supplied by one of the sources above.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable consulted for the dataset root
pub const DATASET_ROOT_ENV: &str = "ALC_DATASET_ROOT";

/// Default number of decode worker threads
pub const DEFAULT_NUM_THREADS: usize = 4;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Corpus root directory (the directory containing `alc_original/`)
    #[serde(default)]
    pub dataset_root: Option<PathBuf>,

    /// Decode pool settings
    #[serde(default)]
    pub pool: PoolSection,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[pool]` table
#[derive(Debug, Clone, Deserialize)]
pub struct PoolSection {
    /// Number of decode worker threads (must be at least 1)
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,

    /// Upper bound on how long the loader waits for the queue to drain.
    /// Absent means wait until every item is acknowledged.
    #[serde(default)]
    pub join_timeout_secs: Option<u64>,
}

impl Default for PoolSection {
    fn default() -> Self {
        Self {
            num_threads: DEFAULT_NUM_THREADS,
            join_timeout_secs: None,
        }
    }
}

impl PoolSection {
    /// Join timeout as a `Duration`, if configured
    pub fn join_timeout(&self) -> Option<Duration> {
        self.join_timeout_secs.map(Duration::from_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_num_threads() -> usize {
    DEFAULT_NUM_THREADS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file.
    ///
    /// # Errors
    /// - File cannot be read
    /// - File is not valid TOML for this schema
    /// - `pool.num_threads` is zero
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `path` (or the platform default location), falling
    /// back to built-in defaults when no file exists.
    ///
    /// Nothing is logged about the outcome; the returned [`ConfigSource`]
    /// is logged by the caller after logging is initialized.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        match candidate {
            Some(p) if p.exists() => Ok((Self::load(&p)?, ConfigSource::File(p))),
            Some(p) if path.is_some() => Ok((Self::default(), ConfigSource::Missing(p))),
            _ => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.pool.num_threads == 0 {
            return Err(Error::Config(
                "pool.num_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where a loaded [`TomlConfig`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// An explicitly requested file did not exist
    Missing(PathBuf),
    /// No file requested and none at the platform location
    Defaults,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(p) => info!("Using config file {}", p.display()),
            ConfigSource::Missing(p) => {
                warn!("Config file {} not found, using defaults", p.display())
            }
            ConfigSource::Defaults => debug!("No config file found, using defaults"),
        }
    }
}

/// Platform config file location: `<config_dir>/alc-loader/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("alc-loader").join("config.toml"))
}

/// Resolve the dataset root following the priority order documented above.
///
/// Existence of the directory is not checked here; the dataset loader does
/// that when it opens the corpus.
pub fn resolve_dataset_root(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    if let Some(root) = &config.dataset_root {
        return Ok(root.clone());
    }

    Err(Error::Config(format!(
        "No dataset root given (use --root, {} or dataset_root in config)",
        env_var_name
    )))
}
