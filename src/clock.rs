//! Clocks

use std::sync::{Mutex, PoisonError};

use jiff::{SignedDuration, Timestamp};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    /// Create a clock frozen at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move forward by `by`; saturates at the end of the supported range.
    pub fn advance(&self, by: SignedDuration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);

        *now = now.checked_add(by).unwrap_or(Timestamp::MAX);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn manual_clock_advances() -> TestResult {
        let start: Timestamp = "2026-03-01T09:00:00Z".parse()?;
        let clock = ManualClock::new(start);

        clock.advance(SignedDuration::from_secs(90));

        assert_eq!(clock.now(), "2026-03-01T09:01:30Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn manual_clock_set() -> TestResult {
        let clock = ManualClock::new(Timestamp::UNIX_EPOCH);
        let later: Timestamp = "2030-01-01T00:00:00Z".parse()?;

        clock.set(later);

        assert_eq!(clock.now(), later);

        Ok(())
    }
}
