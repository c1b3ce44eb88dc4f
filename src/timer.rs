//! One-shot timers on the scene clock.
//!
//! Timers never fire inside `schedule`; a timer scheduled with zero delay
//! comes due on the next tick. Time only moves when the scene ticks, so a
//! paused scene pauses its timers too.

use std::time::Duration;

/// Convert a script offset in seconds to a delay. Negative and NaN offsets
/// mean "now"; offsets too large to represent saturate.
pub fn seconds(secs: f32) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(secs).unwrap_or(Duration::MAX)
}

/// Unique identifier for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct Pending<A> {
    handle: TimerHandle,
    fire_at: Duration,
    action: A,
}

/// Schedules payloads of type `A` to come due after a delay.
pub struct Timers<A> {
    now: Duration,
    pending: Vec<Pending<A>>,
    next_id: u64,
}

impl<A> Timers<A> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Current clock reading.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `action` to come due `delay` from now.
    pub fn schedule(&mut self, delay: Duration, action: A) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            fire_at: self.now.saturating_add(delay),
            action,
        });
        handle
    }

    /// Cancel a pending timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    /// Cancel every pending timer whose payload matches `pred`.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&A) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| !pred(&p.action));
        before - self.pending.len()
    }

    /// Advance the clock and remove the timers now due, in due order
    /// (ties keep scheduling order).
    pub fn advance(&mut self, delta: Duration) -> Vec<A> {
        self.now += delta;
        let now = self.now;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.fire_at <= now);
        self.pending = rest;

        due.sort_by_key(|p| (p.fire_at, p.handle.0));
        due.into_iter().map(|p| p.action).collect()
    }

    pub fn active_count(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<A> Default for Timers<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let mut timers = Timers::new();
        timers.schedule(Duration::ZERO, "a");
        assert_eq!(timers.active_count(), 1);
        assert_eq!(timers.advance(Duration::ZERO), vec!["a"]);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn fires_only_after_delay_elapses() {
        let mut timers = Timers::new();
        timers.schedule(Duration::from_millis(1500), 1);

        assert!(timers.advance(Duration::from_secs(1)).is_empty());
        assert_eq!(timers.advance(Duration::from_millis(500)), vec![1]);
    }

    #[test]
    fn due_timers_come_out_in_due_order() {
        let mut timers = Timers::new();
        timers.schedule(Duration::from_secs(2), "late");
        timers.schedule(Duration::from_secs(1), "early");
        timers.schedule(Duration::from_secs(1), "early-second");

        let fired = timers.advance(Duration::from_secs(3));
        assert_eq!(fired, vec!["early", "early-second", "late"]);
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut timers = Timers::new();
        let h = timers.schedule(Duration::from_secs(1), ());
        assert!(timers.cancel(h));
        assert!(!timers.cancel(h));
        assert!(timers.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn cancel_where_filters_payloads() {
        let mut timers = Timers::new();
        timers.schedule(Duration::from_secs(1), 1);
        timers.schedule(Duration::from_secs(1), 2);
        timers.schedule(Duration::from_secs(1), 3);

        assert_eq!(timers.cancel_where(|n| n % 2 == 1), 2);
        assert_eq!(timers.advance(Duration::from_secs(1)), vec![2]);
    }

    #[test]
    fn seconds_clamps_odd_offsets() {
        assert_eq!(seconds(-1.0), Duration::ZERO);
        assert_eq!(seconds(f32::NAN), Duration::ZERO);
        assert_eq!(seconds(f32::INFINITY), Duration::MAX);
        assert_eq!(seconds(0.25), Duration::from_millis(250));
    }

    #[test]
    fn huge_delay_does_not_overflow_the_clock() {
        let mut timers = Timers::new();
        timers.schedule(Duration::MAX, "never");
        assert!(timers.advance(Duration::from_secs(10)).is_empty());
        assert_eq!(timers.active_count(), 1);
    }
}
