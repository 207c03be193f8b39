//! Virtual clock.

use ctxmenu_core::host::{TimerId, TimerService};
use std::collections::BTreeMap;
use std::time::Duration;

/// Timer service driven by [`advance`](Self::advance) instead of wall time.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now_ms: u64,
    next_id: u64,
    /// Deadline per pending timer
    pending: BTreeMap<TimerId, u64>,
    scheduled: usize,
    cancelled: usize,
}

impl ManualTimers {
    /// Clock at zero with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub const fn now(&self) -> u64 {
        self.now_ms
    }

    /// Move time forward and return the timers that fired, earliest first.
    ///
    /// Fired timers are no longer pending; the caller is expected to hand
    /// each id to the controller.
    pub fn advance(&mut self, ms: u64) -> Vec<TimerId> {
        self.now_ms = self.now_ms.saturating_add(ms);
        let mut due: Vec<(u64, TimerId)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now_ms)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort_unstable();
        for (_, id) in &due {
            self.pending.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Whether `id` is scheduled and not yet fired or cancelled.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Number of pending timers.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Deadline of `id`, if pending.
    pub fn deadline(&self, id: TimerId) -> Option<u64> {
        self.pending.get(&id).copied()
    }

    /// Total `schedule` calls.
    pub const fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Total `cancel` calls that removed a pending timer.
    pub const fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl TimerService for ManualTimers {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.pending.insert(id, self.now_ms.saturating_add(delay_ms));
        self.scheduled += 1;
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if self.pending.remove(&id).is_some() {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut timers = ManualTimers::new();
        let late = timers.schedule(Duration::from_millis(300));
        let early = timers.schedule(Duration::from_millis(100));

        assert_eq!(timers.advance(1_000), vec![early, late]);
        assert_eq!(timers.pending_count(), 0);
        assert_eq!(timers.now(), 1_000);
    }

    #[test]
    fn test_cancel() {
        let mut timers = ManualTimers::new();
        let id = timers.schedule(Duration::from_millis(10));
        timers.cancel(id);
        timers.cancel(id);

        assert!(!timers.is_pending(id));
        assert_eq!(timers.cancelled(), 1);
        assert!(timers.advance(50).is_empty());
    }

    #[test]
    fn test_deadline_is_relative_to_now() {
        let mut timers = ManualTimers::new();
        timers.advance(40);
        let id = timers.schedule(Duration::from_millis(10));
        assert_eq!(timers.deadline(id), Some(50));
    }

    proptest! {
        #[test]
        fn prop_timer_fires_exactly_once(delay in 0u64..10_000, step in 1u64..500) {
            let mut timers = ManualTimers::new();
            let id = timers.schedule(Duration::from_millis(delay));
            let mut fired = 0;
            let mut elapsed = 0;
            while elapsed <= delay + step {
                fired += timers.advance(step).iter().filter(|t| **t == id).count();
                elapsed += step;
            }
            prop_assert_eq!(fired, 1);
        }
    }
}
