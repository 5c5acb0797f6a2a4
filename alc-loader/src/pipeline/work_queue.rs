//! Work Queue
//!
//! Thread-safe FIFO with completion tracking. Every pushed item must be
//! acknowledged with [`WorkQueue::task_done`] once the consumer is finished
//! with it; [`WorkQueue::join`] returns only after all of them have been.
//!
//! Consumers either poll with [`WorkQueue::try_pop`] or sleep in
//! [`WorkQueue::pop`], which returns `None` once the queue has been closed
//! and drained.

use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::warn;

struct QueueState<T> {
    items: VecDeque<T>,

    /// Pushed but not yet acknowledged (queued + in flight)
    unfinished: usize,

    /// No further pushes accepted
    closed: bool,
}

/// FIFO of pending work with a join point.
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,

    /// Signalled on push and on close
    available: Condvar,

    /// Signalled when `unfinished` reaches zero
    all_done: Condvar,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                unfinished: 0,
                closed: false,
            }),
            available: Condvar::new(),
            all_done: Condvar::new(),
        }
    }

    // State is only mutated in short non-panicking sections, so a poisoned
    // lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue an item. Fails once the queue is closed.
    pub fn push(&self, item: T) -> Result<()> {
        {
            let mut state = self.lock();
            if state.closed {
                return Err(Error::Queue("push after close".to_string()));
            }
            state.items.push_back(item);
            state.unfinished += 1;
        }
        self.available.notify_one();
        Ok(())
    }

    /// Non-blocking pop. `None` if nothing is queued right now.
    pub fn try_pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Blocking pop. Sleeps until an item is available; returns `None` once
    /// the queue is closed and empty.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Stop accepting pushes and wake every blocked consumer.
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }

    /// Acknowledge one popped item as finished.
    pub fn task_done(&self) -> Result<()> {
        let mut state = self.lock();
        if state.unfinished == 0 {
            return Err(Error::Queue(
                "task_done called more times than items were pushed".to_string(),
            ));
        }
        state.unfinished -= 1;
        if state.unfinished == 0 {
            self.all_done.notify_all();
        }
        Ok(())
    }

    /// Block until every pushed item has been acknowledged.
    pub fn join(&self) {
        let mut state = self.lock();
        while state.unfinished > 0 {
            state = self
                .all_done
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`join`](Self::join) but gives up after `timeout`.
    ///
    /// # Errors
    /// `JoinTimeout` carrying the number of unacknowledged items.
    pub fn join_timeout(&self, timeout: Duration) -> Result<()> {
        let state = self.lock();
        let (state, result) = self
            .all_done
            .wait_timeout_while(state, timeout, |s| s.unfinished > 0)
            .unwrap_or_else(PoisonError::into_inner);

        if result.timed_out() && state.unfinished > 0 {
            return Err(Error::JoinTimeout {
                timeout,
                outstanding: state.unfinished,
            });
        }
        Ok(())
    }

    /// Items queued and not yet popped
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Items pushed and not yet acknowledged
    pub fn unfinished(&self) -> usize {
        self.lock().unfinished
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

/// Acknowledges one item when dropped, including during a panic unwind.
pub struct AckGuard<'a, T> {
    queue: &'a WorkQueue<T>,
}

impl<'a, T> AckGuard<'a, T> {
    pub fn new(queue: &'a WorkQueue<T>) -> Self {
        Self { queue }
    }
}

impl<T> Drop for AckGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.queue.task_done() {
            warn!("Work item acknowledgment failed: {}", e);
        }
    }
}
