//! Trailing-edge debounce for user input

use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs only the last of a burst of calls, `delay` after it was made
///
/// Owns at most one pending timer task. A new call aborts the pending one,
/// and dropping the debouncer aborts whatever is still waiting.
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

    /// Schedules `action`, replacing any pending one
    ///
    /// Must be called from within a Tokio runtime.
    pub fn call<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });

        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
    }

    /// Aborts the pending action, if any
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
