//! Manually advanced scheduler

use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use super::{Scheduler, Task, TimerHandle};

struct Pending {
    due: Duration,
    sequence: u64,
    cancelled: Arc<AtomicBool>,
    task: Task,
}

#[derive(Default)]
struct Queue {
    elapsed: Duration,
    next_sequence: u64,
    pending: Vec<Pending>,
}

/// Deterministic scheduler whose time only moves through [`ManualScheduler::advance`].
///
/// Tasks due at the same instant run in scheduling order. Tasks may schedule further tasks;
/// those run within the same `advance` call if they fall due before it ends.
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<Queue>,
}

impl ManualScheduler {
    /// Create a scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed
    }

    /// Number of tasks that have neither run nor been cancelled.
    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .iter()
            .filter(|pending| !pending.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Move time forward by `by`, running every task that falls due. Returns how many ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.elapsed().saturating_add(by);
        let mut ran = 0;

        while let Some(next) = self.pop_due(target) {
            if !next.cancelled.load(Ordering::SeqCst) {
                (next.task)();
                ran += 1;
            }
        }

        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed = target;

        ran
    }

    fn pop_due(&self, target: Duration) -> Option<Pending> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);

        let position = queue
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= target)
            .min_by_key(|(_, pending)| (pending.due, pending.sequence))
            .map(|(position, _)| position)?;

        let next = queue.pending.swap_remove(position);
        queue.elapsed = queue.elapsed.max(next.due);

        Some(next)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);

        let sequence = queue.next_sequence;
        queue.next_sequence += 1;

        let due = queue.elapsed.saturating_add(delay);
        queue.pending.push(Pending {
            due,
            sequence,
            cancelled: Arc::clone(&cancelled),
            task,
        });

        TimerHandle::new(move || cancelled.store(true, Ordering::SeqCst))
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("elapsed", &self.elapsed())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let shared = Arc::clone(&log);

        let make = move |label: &'static str| -> Task {
            let log = Arc::clone(&shared);

            Box::new(move || {
                log.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(label);
            })
        };

        (log, make)
    }

    fn entries(log: &Mutex<Vec<&'static str>>) -> Vec<&'static str> {
        log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[test]
    fn runs_due_tasks_in_time_order() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        let _shipped = scheduler.schedule_once(Duration::from_secs(30), task("shipped"));
        let _confirmed = scheduler.schedule_once(Duration::from_secs(2), task("confirmed"));
        let _processing = scheduler.schedule_once(Duration::from_secs(10), task("processing"));

        assert_eq!(scheduler.advance(Duration::from_secs(1)), 0);
        assert_eq!(scheduler.advance(Duration::from_secs(10)), 2);
        assert_eq!(entries(&log), ["confirmed", "processing"]);
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.advance(Duration::from_secs(60)), 1);
        assert_eq!(entries(&log), ["confirmed", "processing", "shipped"]);
        assert_eq!(scheduler.elapsed(), Duration::from_secs(71));
    }

    #[test]
    fn same_instant_runs_in_scheduling_order() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        let _a = scheduler.schedule_once(Duration::from_secs(5), task("a"));
        let _b = scheduler.schedule_once(Duration::from_secs(5), task("b"));

        scheduler.advance(Duration::from_secs(5));

        assert_eq!(entries(&log), ["a", "b"]);
    }

    #[test]
    fn cancelled_tasks_are_skipped() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler
            .schedule_once(Duration::from_secs(1), task("cancelled"))
            .cancel();
        let _kept = scheduler.schedule_once(Duration::from_secs(1), task("kept"));

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), 1);
        assert_eq!(entries(&log), ["kept"]);
    }

    #[test]
    fn tasks_can_schedule_follow_ups() {
        let scheduler = Arc::new(ManualScheduler::new());
        let (log, task) = recorder();
        let follow_up = task("follow-up");
        let inner = Arc::clone(&scheduler);

        let _first = scheduler.schedule_once(
            Duration::from_secs(1),
            Box::new(move || {
                let _second = inner.schedule_once(Duration::from_secs(1), follow_up);
            }),
        );

        assert_eq!(scheduler.advance(Duration::from_secs(3)), 2);
        assert_eq!(entries(&log), ["follow-up"]);
    }
}
