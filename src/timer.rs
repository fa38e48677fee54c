//! Cancelable scheduled tasks on a manually advanced clock.
//!
//! Nothing here reads the wall clock: callers feed elapsed time into
//! [`Timers::pop_until`], which hands back due tasks one at a time in due
//! order. Handling a task may schedule or cancel others before the next one
//! is popped, so a cancelled task can never fire late.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Scheduled<T> {
    handle: TimerHandle,
    due: Duration,
    task: T,
}

#[derive(Debug)]
pub struct Timers<T> {
    now: Duration,
    next_id: u64,
    scheduled: Vec<Scheduled<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            scheduled: Vec::new(),
        }
    }

    /// Time elapsed on this clock since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.scheduled.push(Scheduled {
            handle,
            due: self.now + delay,
            task,
        });
        handle
    }

    /// Removes a pending task, returning it if it had not fired yet.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let idx = self.scheduled.iter().position(|s| s.handle == handle)?;
        Some(self.scheduled.swap_remove(idx).task)
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.scheduled.iter().any(|s| s.handle == handle)
    }

    /// Time left until `handle` fires.
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.scheduled
            .iter()
            .find(|s| s.handle == handle)
            .map(|s| s.due.saturating_sub(self.now))
    }

    /// Pops the earliest task due at or before `deadline`, moving the clock to
    /// its due time. When nothing is due the clock moves to `deadline`.
    pub fn pop_until(&mut self, deadline: Duration) -> Option<(TimerHandle, T)> {
        let idx = self
            .scheduled
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= deadline)
            .min_by_key(|(_, s)| (s.due, s.handle))
            .map(|(i, _)| i);

        match idx {
            Some(i) => {
                let s = self.scheduled.swap_remove(i);
                self.now = self.now.max(s.due);
                Some((s.handle, s.task))
            }
            None => {
                self.now = self.now.max(deadline);
                None
            }
        }
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.scheduled.clear();
    }

    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn fires_in_due_order() {
        let mut timers = Timers::new();
        timers.schedule(secs(3), "c");
        timers.schedule(secs(1), "a");
        timers.schedule(secs(2), "b");

        let mut fired = vec![];
        while let Some((_, t)) = timers.pop_until(secs(5)) {
            fired.push((t, timers.now()));
        }

        assert_eq!(fired, vec![("a", secs(1)), ("b", secs(2)), ("c", secs(3))]);
        assert_eq!(timers.now(), secs(5));
        assert!(timers.is_empty());
    }

    #[test]
    fn ties_fire_in_schedule_order() {
        let mut timers = Timers::new();
        timers.schedule(secs(1), 1);
        timers.schedule(secs(1), 2);

        assert_eq!(timers.pop_until(secs(1)).map(|(_, t)| t), Some(1));
        assert_eq!(timers.pop_until(secs(1)).map(|(_, t)| t), Some(2));
    }

    #[test]
    fn nothing_fires_before_due() {
        let mut timers = Timers::new();
        let h = timers.schedule(secs(2), ());

        assert!(timers.pop_until(Duration::from_millis(1_999)).is_none());
        assert_eq!(timers.remaining(h), Some(Duration::from_millis(1)));
        assert!(timers.pop_until(secs(2)).is_some());
        assert!(!timers.is_pending(h));
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut timers = Timers::new();
        let h = timers.schedule(secs(1), "boom");
        timers.schedule(secs(2), "ok");

        assert_eq!(timers.cancel(h), Some("boom"));
        assert_eq!(timers.cancel(h), None);
        assert_eq!(timers.pop_until(secs(10)).map(|(_, t)| t), Some("ok"));
        assert!(timers.pop_until(secs(10)).is_none());
    }

    #[test]
    fn rescheduling_from_a_fired_task_uses_its_due_time() {
        let mut timers = Timers::new();
        timers.schedule(secs(1), 0u32);

        // a three second jump should fire a self-rescheduling tick three times
        let deadline = secs(3);
        let mut count = 0;
        while let Some((_, n)) = timers.pop_until(deadline) {
            count += 1;
            timers.schedule(secs(1), n + 1);
        }

        assert_eq!(count, 3);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.now(), secs(3));
    }

    #[test]
    fn clear_drops_everything() {
        let mut timers = Timers::new();
        timers.schedule(secs(1), ());
        timers.schedule(secs(2), ());
        timers.clear();
        assert!(timers.pop_until(secs(5)).is_none());
    }
}
