//! Resettable quiet-interval timer holding the latest scheduled value.
use std::time::Duration;

/// Fires once after `interval` has passed without a new [`Debouncer::schedule`] call.
///
/// Every call replaces the pending value and restarts the timer; earlier values in the
/// window are dropped.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    interval: Duration,
    deadline: Option<Duration>,
    pending: Option<T>,
    collapsed: u64,
}

impl<T> Debouncer<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            pending: None,
            collapsed: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Schedules `value` to fire at `now + interval`, replacing anything pending.
    pub fn schedule(&mut self, now: Duration, value: T) {
        self.schedule_at(now + self.interval, value);
    }

    /// Schedules `value` to fire on the next poll at or after `now`.
    pub fn schedule_immediate(&mut self, now: Duration, value: T) {
        self.schedule_at(now, value);
    }

    fn schedule_at(&mut self, deadline: Duration, value: T) {
        if self.pending.replace(value).is_some() {
            self.collapsed += 1;
        }
        self.deadline = Some(deadline);
    }

    /// Cancels the timer and returns the value that would have fired.
    pub fn reset(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    /// Returns the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.reset(),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Number of scheduled values that were superseded before firing.
    pub fn collapsed(&self) -> u64 {
        self.collapsed
    }
}
