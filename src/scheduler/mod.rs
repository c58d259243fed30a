//! One-shot timers
//!
//! The order engine simulates fulfilment by scheduling delayed status changes. Going through a
//! [`Scheduler`] keeps that logic independent of where the delays come from: tokio timers in
//! the binary, a manually advanced queue in tests, or a real fulfilment feed later.

use std::{fmt, time::Duration};

use thiserror::Error;

mod manual;
mod runtime;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

/// Deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Scheduler errors.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// No tokio runtime is running on this thread.
    #[error("no tokio runtime available")]
    NoRuntime(#[source] tokio::runtime::TryCurrentError),
}

/// Runs tasks once after a delay.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`. Dropping the returned handle does not cancel the task.
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerHandle;
}

/// Handle to a scheduled task.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    /// Wrap the scheduler-specific cancellation.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Prevent the task from running if it has not run yet.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}
