//! Test helper modules for alc-loader integration tests
//!
//! - audio_generator: deterministic WAV fixtures (hound)
//! - corpus: throwaway corpus checkouts in a TempDir

#![allow(dead_code)]

pub mod audio_generator;
pub mod corpus;

pub use audio_generator::{generate_ramp_wav, generate_sine_wav};
pub use corpus::{TableRow, TestCorpus};
