//! # ALC Corpus Loader Library (alc-loader)
//!
//! Loads the ALC speech corpus into 16 kHz mono waveforms paired with binary
//! intoxication labels.
//!
//! **Architecture:** metadata tables → work queue → fixed pool of decode
//! threads (symphonia + rubato), each filling a private result map → merge →
//! projection back into table order → optional prefix slicing.

pub mod audio;
pub mod dataset;
pub mod error;
pub mod metadata;
pub mod pipeline;

pub use audio::{AudioDecoder, SymphoniaDecoder, Waveform};
pub use dataset::{AlcDataset, LoadedSplit, SplitDecode};
pub use error::{Error, Result};
pub use metadata::{MetadataRecord, Split, SplitTable};
pub use pipeline::{CompletionReport, DecodeFailure, DecoderPool, PoolConfig};
