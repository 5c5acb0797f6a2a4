//! Error types for alc-loader
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use crate::pipeline::DecodeFailure;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for alc-loader
#[derive(Error, Debug)]
pub enum Error {
    /// Dataset root directory does not exist
    #[error("Dataset root not found: {}", .0.display())]
    DatasetRootNotFound(PathBuf),

    /// Split name outside {train, dev1, dev2, test}
    #[error("Invalid split '{0}' (expected train, dev1, dev2 or test)")]
    InvalidSplit(String),

    /// Metadata table could not be parsed
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Audio decoding errors
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Same identifier produced by more than one worker
    #[error("Duplicate result for '{0}' across worker maps")]
    DuplicateResult(String),

    /// Identifiers expected in a split without a decoded waveform
    #[error("{} identifier(s) have no decoded waveform (first: {}); {} decode failure(s) recorded", .missing.len(), .missing.first().map(String::as_str).unwrap_or("-"), .failures.len())]
    MissingResult {
        missing: Vec<String>,
        failures: Vec<DecodeFailure>,
    },

    /// Waveform and label sequences of different length
    #[error("Length mismatch: {waveforms} waveforms, {labels} labels")]
    LengthMismatch { waveforms: usize, labels: usize },

    /// Work queue misuse
    #[error("Queue error: {0}")]
    Queue(String),

    /// Bounded join elapsed with items still unacknowledged
    #[error("Decode pool did not drain within {timeout:?} ({outstanding} item(s) outstanding)")]
    JoinTimeout {
        timeout: Duration,
        outstanding: usize,
    },

    /// Invalid loader configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using alc-loader Error
pub type Result<T> = std::result::Result<T, Error>;
