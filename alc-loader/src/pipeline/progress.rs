//! Progress reporting for the decode pool
//!
//! Reporters are injected into the pool and receive one event per finished
//! item, whichever worker finished it.

use serde::Serialize;
use std::sync::mpsc::{Sender, SyncSender, TrySendError};
use tracing::{info, trace};

/// Result of one work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Decoded { samples: usize },
    Failed { reason: String },
}

/// One finished work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Items finished so far, this one included
    pub completed: usize,
    /// Items submitted to the pool
    pub total: usize,
    pub file_id: String,
    pub outcome: ItemOutcome,
}

impl ProgressEvent {
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }
}

/// Sink for progress events. Called concurrently from every worker.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

impl ProgressReporter for Sender<ProgressEvent> {
    fn report(&self, event: &ProgressEvent) {
        // Receiver gone: nobody is listening any more
        let _ = self.send(event.clone());
    }
}

/// Never blocks a worker: events that do not fit in the channel are dropped.
impl ProgressReporter for SyncSender<ProgressEvent> {
    fn report(&self, event: &ProgressEvent) {
        if let Err(TrySendError::Full(dropped)) = self.try_send(event.clone()) {
            trace!("Progress channel full, dropped event for {}", dropped.file_id);
        }
    }
}

/// Logs a line every `every` items and on the last one.
#[derive(Debug, Clone, Copy)]
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ProgressReporter for LogProgress {
    fn report(&self, event: &ProgressEvent) {
        if event.completed % self.every == 0 || event.completed == event.total {
            info!(
                "Decoded {}/{} ({} left)",
                event.completed,
                event.total,
                event.remaining()
            );
        }
    }
}
