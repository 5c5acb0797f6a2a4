//! Decoder Pool
//!
//! Fixed pool of OS threads decoding a list of recordings in parallel.
//!
//! The producer pushes every identifier into a [`WorkQueue`] and closes it
//! before the workers start. Each worker pops one identifier at a time,
//! decodes it, and stores the waveform in a map that only that worker owns;
//! no result storage is shared, so none is locked. The pool synchronizes on
//! the queue's join, then takes the private maps back through the worker
//! join handles.
//!
//! A failed decode never stops a worker: the error is logged, recorded as a
//! [`DecodeFailure`], and the item is still acknowledged.

use crate::audio::{AudioDecoder, Waveform};
use crate::error::{Error, Result};
use crate::pipeline::progress::{ItemOutcome, ProgressEvent, ProgressReporter};
use crate::pipeline::work_queue::{AckGuard, WorkQueue};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Default number of decode worker threads
pub const DEFAULT_NUM_THREADS: usize = 4;

/// Pool sizing and join policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Worker thread count, at least 1
    pub num_threads: usize,

    /// Bounded wait for the queue to drain. `None` waits indefinitely.
    pub join_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_threads: DEFAULT_NUM_THREADS,
            join_timeout: None,
        }
    }
}

impl PoolConfig {
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(Error::Config("num_threads must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl From<&alc_common::PoolSection> for PoolConfig {
    fn from(section: &alc_common::PoolSection) -> Self {
        Self {
            num_threads: section.num_threads,
            join_timeout: section.join_timeout(),
        }
    }
}

/// A recording that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeFailure {
    pub file_id: String,
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of one pool run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    /// Identifiers pushed into the queue
    pub submitted: usize,

    /// Identifiers decoded successfully
    pub succeeded: usize,

    /// Per-file failures, in no particular order
    pub failures: Vec<DecodeFailure>,

    /// Workers whose thread panicked; their decoded results are lost
    pub panicked_workers: usize,

    /// Wall-clock time from first push to last worker joined
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl CompletionReport {
    /// True when every submitted identifier was decoded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.panicked_workers == 0 && self.succeeded == self.submitted
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.file_id.as_str()).collect()
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

/// Private results of one worker.
#[derive(Debug, Default)]
pub struct WorkerOutput {
    pub decoded: HashMap<String, Waveform>,
    pub failures: Vec<DecodeFailure>,
}

/// Everything the pool hands back after draining the queue.
#[derive(Debug)]
pub struct PoolOutcome {
    /// One map per worker that exited normally; keys are disjoint
    pub worker_maps: Vec<HashMap<String, Waveform>>,
    pub report: CompletionReport,
}

/// Multi-threaded decoder pool
pub struct DecoderPool {
    config: PoolConfig,
    decoder: Arc<dyn AudioDecoder>,
    progress: Option<Arc<dyn ProgressReporter>>,
}

impl DecoderPool {
    /// # Errors
    /// `Config` if `num_threads` is zero.
    pub fn new(config: PoolConfig, decoder: Arc<dyn AudioDecoder>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            decoder,
            progress: None,
        })
    }

    /// Attach a progress reporter.
    pub fn with_progress(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress = Some(reporter);
        self
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Decode every identifier in `file_ids`, resolving each against `data_dir`.
    ///
    /// Per-file decode errors do not fail the call; they are listed in the
    /// returned report.
    ///
    /// # Errors
    /// - `Queue` if `file_ids` contains an identifier twice
    /// - `JoinTimeout` if a join timeout is configured and elapses; workers
    ///   still running are left detached
    /// - `Io` if a worker thread cannot be spawned
    pub fn decode_all(&self, data_dir: &Path, file_ids: &[String]) -> Result<PoolOutcome> {
        let start = Instant::now();
        let total = file_ids.len();

        let mut seen = HashSet::with_capacity(total);
        if let Some(dup) = file_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(Error::Queue(format!("identifier '{}' submitted twice", dup)));
        }

        // Single producer: everything is queued before any worker starts
        let queue = Arc::new(WorkQueue::new());
        for file_id in file_ids {
            queue.push(file_id.clone())?;
        }
        queue.close();

        info!(
            "Decoding {} file(s) from {} with {} worker(s)",
            total,
            data_dir.display(),
            self.config.num_threads
        );

        let completed = Arc::new(AtomicUsize::new(0));
        let data_dir: Arc<Path> = Arc::from(data_dir);

        let mut handles: Vec<JoinHandle<WorkerOutput>> = Vec::with_capacity(self.config.num_threads);
        for worker_id in 0..self.config.num_threads {
            let ctx = WorkerContext {
                worker_id,
                queue: Arc::clone(&queue),
                data_dir: Arc::clone(&data_dir),
                decoder: Arc::clone(&self.decoder),
                progress: self.progress.clone(),
                completed: Arc::clone(&completed),
                total,
            };

            let handle = thread::Builder::new()
                .name(format!("decode-worker-{}", worker_id))
                .spawn(move || ctx.run())?;
            handles.push(handle);
        }

        // The queue's join is the synchronization point; worker handles are
        // only joined afterwards to take ownership of their maps.
        match self.config.join_timeout {
            Some(timeout) => {
                if let Err(e) = queue.join_timeout(timeout) {
                    error!("Decode pool join failed: {}", e);
                    return Err(e);
                }
            }
            None => queue.join(),
        }

        let mut report = CompletionReport {
            submitted: total,
            ..CompletionReport::default()
        };
        let mut worker_maps = Vec::with_capacity(handles.len());

        for (worker_id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(output) => {
                    report.succeeded += output.decoded.len();
                    report.failures.extend(output.failures);
                    worker_maps.push(output.decoded);
                }
                Err(_) => {
                    error!("Worker {} panicked, its results are lost", worker_id);
                    report.panicked_workers += 1;
                }
            }
        }

        report.elapsed = start.elapsed();

        if report.is_complete() {
            info!("Decoded {} file(s) in {:.2?}", report.succeeded, report.elapsed);
        } else {
            warn!(
                "Decoded {}/{} file(s) in {:.2?}: {} failure(s), {} panicked worker(s)",
                report.succeeded,
                report.submitted,
                report.elapsed,
                report.failures.len(),
                report.panicked_workers
            );
        }

        Ok(PoolOutcome {
            worker_maps,
            report,
        })
    }
}

/// State moved into one worker thread.
struct WorkerContext {
    worker_id: usize,
    queue: Arc<WorkQueue<String>>,
    data_dir: Arc<Path>,
    decoder: Arc<dyn AudioDecoder>,
    progress: Option<Arc<dyn ProgressReporter>>,
    completed: Arc<AtomicUsize>,
    total: usize,
}

impl WorkerContext {
    /// Worker thread main loop
    fn run(self) -> WorkerOutput {
        debug!("Worker {} started", self.worker_id);
        let mut output = WorkerOutput::default();

        while let Some(file_id) = self.queue.pop() {
            // Acknowledged before reporting, or on unwind if decoding panics
            let ack = AckGuard::new(&*self.queue);

            let path = self.data_dir.join(&file_id);
            let outcome = match self.decode_one(&path) {
                Ok(waveform) => {
                    debug!(
                        "Worker {} decoded {} ({} samples)",
                        self.worker_id,
                        file_id,
                        waveform.len()
                    );
                    let outcome = ItemOutcome::Decoded {
                        samples: waveform.len(),
                    };
                    output.decoded.insert(file_id.clone(), waveform);
                    outcome
                }
                Err(reason) => {
                    warn!("Worker {} decode failed for {}: {}", self.worker_id, file_id, reason);
                    output.failures.push(DecodeFailure {
                        file_id: file_id.clone(),
                        path,
                        reason: reason.clone(),
                    });
                    ItemOutcome::Failed { reason }
                }
            };

            drop(ack);

            let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(progress) = &self.progress {
                progress.report(&ProgressEvent {
                    completed,
                    total: self.total,
                    file_id,
                    outcome,
                });
            }
        }

        debug!(
            "Worker {} exiting ({} decoded, {} failed)",
            self.worker_id,
            output.decoded.len(),
            output.failures.len()
        );
        output
    }

    /// Decode one file, turning a decoder panic into an ordinary failure.
    fn decode_one(&self, path: &Path) -> std::result::Result<Waveform, String> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.decoder.decode(path))) {
            Ok(Ok(waveform)) => Ok(waveform),
            Ok(Err(e)) => Err(e.to_string()),
            Err(payload) => {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(format!("decoder panicked: {}", msg))
            }
        }
    }
}
