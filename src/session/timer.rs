use super::event::TimerId;
use std::time::{Duration, Instant};

/// Deadline-ordered set of armed timers
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<(Instant, TimerId)>,
}

impl TimerQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `timer` to fire `after` from `now`; re-arming replaces the old deadline
    pub fn schedule(&mut self, timer: TimerId, now: Instant, after: Duration) {
        self.cancel(timer);
        let deadline = now + after;
        let idx = self
            .entries
            .partition_point(|(existing, _)| *existing <= deadline);
        self.entries.insert(idx, (deadline, timer));
    }

    /// Disarm `timer`; returns false if it was not armed
    pub fn cancel(&mut self, timer: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(_, id)| *id != timer);
        self.entries.len() != before
    }

    /// Earliest deadline, if any timer is armed
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first().map(|(deadline, _)| *deadline)
    }

    /// Remove and return every timer due at `now`, earliest first
    pub fn pop_due(&mut self, now: Instant) -> Vec<TimerId> {
        let due = self.entries.partition_point(|(deadline, _)| *deadline <= now);
        self.entries.drain(..due).map(|(_, id)| id).collect()
    }

    /// Number of armed timers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is armed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
