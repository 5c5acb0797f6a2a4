//! Concurrent bulk decode pipeline
//!
//! Work queue → decoder pool (private per-worker result maps) → merge →
//! ordered projection → optional slicing.

pub mod aggregator;
pub mod decoder_pool;
pub mod progress;
pub mod slicer;
pub mod work_queue;

pub use aggregator::{merge, project};
pub use decoder_pool::{
    CompletionReport, DecodeFailure, DecoderPool, PoolConfig, PoolOutcome, WorkerOutput,
};
pub use progress::{ItemOutcome, LogProgress, ProgressEvent, ProgressReporter};
pub use slicer::slice;
pub use work_queue::{AckGuard, WorkQueue};
