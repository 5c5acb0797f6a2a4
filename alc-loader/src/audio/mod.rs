//! Audio decoding subsystem
//!
//! Whole-file decode (symphonia) → mono downmix → resample to 16 kHz (rubato).

pub mod decoder;
pub mod resampler;
pub mod types;

pub use decoder::{AudioDecoder, SymphoniaDecoder};
pub use resampler::{Resampler, TARGET_SAMPLE_RATE};
pub use types::Waveform;
