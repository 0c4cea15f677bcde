use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{trace, warn};

/// A consistent copy of the shared tally and its completion flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    /// Number of matching lines published so far
    pub count: u64,
    /// True once the worker has finished and `count` is final
    pub done: bool,
}

#[derive(Debug, Default)]
struct CounterState {
    count: u64,
    done: bool,
}

/// Shared tally written by the scanning worker and read by the controller.
///
/// Both fields live behind one mutex, so `write`, `mark_done` and `read` never
/// interleave and a reader always sees a pair that existed at some instant.
/// Cloning produces another handle to the same cell.
#[derive(Debug, Clone, Default)]
pub struct SharedCounter {
    state: Arc<Mutex<CounterState>>,
}

impl SharedCounter {
    /// Creates a counter with `count = 0` and `done = false`
    pub fn new() -> Self {
        Self::default()
    }

    // The guarded data is two scalars and is valid after any partial critical
    // section, so a poisoned lock is simply taken over.
    fn lock(&self) -> MutexGuard<'_, CounterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes the final tally. Ignored once the counter is marked done.
    pub fn write(&self, value: u64) {
        let mut state = self.lock();
        if state.done {
            drop(state);
            warn!("Ignoring write of {} to a completed counter", value);
            return;
        }
        state.count = value;
        trace!("Counter written: {}", value);
    }

    /// Marks the tally as final. Idempotent.
    pub fn mark_done(&self) {
        self.lock().done = true;
        trace!("Counter marked done");
    }

    /// Returns a snapshot of both fields taken under the lock
    pub fn read(&self) -> CounterSnapshot {
        let state = self.lock();
        CounterSnapshot {
            count: state.count,
            done: state.done,
        }
    }

    /// Convenience for `read().done`
    pub fn is_done(&self) -> bool {
        self.read().done
    }
}

/// Marks a counter done when dropped, including during unwinding.
pub(crate) struct CompletionGuard {
    counter: SharedCounter,
}

impl CompletionGuard {
    pub(crate) fn new(counter: SharedCounter) -> Self {
        Self { counter }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.counter.mark_done();
    }
}
