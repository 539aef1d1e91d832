//! Completed-line queue between the interrupt side and the blocking reader
//!
//! The one synchronized resource in the crate: an unbounded FIFO whose
//! contents and non-empty signal are updated together under a single mutex.
//! `remove` suspends on a condvar until a producer inserts; no polling.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Unbounded thread-safe FIFO of completed lines.
///
/// `insert` never blocks. `remove` blocks the calling thread until a line is
/// available and always returns the oldest not-yet-removed line, regardless
/// of how many consumers are waiting.
#[derive(Debug, Default)]
pub struct LineQueue {
    lines: Mutex<VecDeque<String>>,
    ready: Condvar,
}

impl LineQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A producer or consumer that panicked mid-push leaves the deque in a
        // consistent state, so poisoning is recoverable.
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a line to the tail and wake one waiting consumer.
    pub fn insert(&self, line: String) {
        let mut lines = self.lock();
        lines.push_back(line);
        trace!(depth = lines.len(), "line queued");
        drop(lines);
        self.ready.notify_one();
    }

    /// Dequeue the head, blocking until a line is available.
    pub fn remove(&self) -> String {
        let mut lines = self.lock();
        loop {
            if let Some(line) = lines.pop_front() {
                return line;
            }
            lines = self
                .ready
                .wait(lines)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Best-effort snapshot of the current queue depth.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the queue is currently empty (snapshot, like [`len`](Self::len)).
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
