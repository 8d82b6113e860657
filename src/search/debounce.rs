//! Cancellable delayed execution.
//!
//! Scheduling again before the delay elapses cancels the pending callback.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs the most recently scheduled task once input has been quiet for `delay`.
///
/// Only the timer is cancellable. Once it fires, the task runs on its own
/// and later calls to `schedule` or `cancel` do not abort it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `task` after the delay, cancelling any unfired predecessor.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });

        if let Some(previous) = self.slot().replace(timer) {
            previous.abort();
        }
    }

    /// Cancels the pending callback. Returns true if one had not fired yet.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(timer) => {
                let unfired = !timer.is_finished();
                timer.abort();
                unfired
            }
            None => false,
        }
    }

    /// True while a scheduled callback is waiting for its delay.
    pub fn is_pending(&self) -> bool {
        self.slot().as_ref().is_some_and(|timer| !timer.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
