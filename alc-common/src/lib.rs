//! # ALC Common Library
//!
//! Shared code for the ALC corpus tooling:
//! - Error types
//! - TOML bootstrap configuration
//! - Dataset root resolution

pub mod config;
pub mod error;

pub use config::{ConfigSource, LoggingConfig, PoolSection, TomlConfig};
pub use error::{Error, Result};
