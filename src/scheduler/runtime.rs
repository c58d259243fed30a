//! Tokio-backed scheduler

use std::time::Duration;

use tokio::{runtime::Handle, time};

use super::{Scheduler, SchedulerError, Task, TimerHandle};

/// Schedules tasks as tokio tasks sleeping for the delay.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Schedule onto the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Schedule onto the runtime driving the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoRuntime`] outside a tokio runtime.
    pub fn current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(SchedulerError::NoRuntime)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerHandle {
        let join = self.handle.spawn(async move {
            time::sleep(delay).await;
            task();
        });

        TimerHandle::new(move || join.abort())
    }
}
