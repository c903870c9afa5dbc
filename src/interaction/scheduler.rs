//! Deferred work on a virtual clock
//!
//! Two queues, mirroring the browser event loop:
//! - timers (`setTimeout`): run once the clock reaches their due time,
//!   ties broken by scheduling order
//! - animation frames (`requestAnimationFrame`): run at the next rendered
//!   frame; callbacks requested while a frame runs wait for the following one
//!
//! There is no cancellation. Everything scheduled eventually runs.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

#[derive(Debug)]
struct Timer<T> {
    due: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Timer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Timer<T> {}

impl<T> PartialOrd for Timer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Timer<T> {
    // reversed: BinaryHeap is a max-heap, we want the earliest first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    seq: u64,
    timers: BinaryHeap<Timer<T>>,
    frame: Vec<T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            timers: BinaryHeap::new(),
            frame: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward; the clock never goes backwards
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn set_timeout(&mut self, delay: Duration, task: T) {
        self.seq += 1;
        self.timers.push(Timer {
            due: self.now + delay,
            seq: self.seq,
            task,
        });
    }

    pub fn request_animation_frame(&mut self, task: T) {
        self.frame.push(task);
    }

    /// Pop the earliest timer due at the current clock, if any
    pub fn pop_due(&mut self) -> Option<T> {
        if self.timers.peek().is_some_and(|t| t.due <= self.now) {
            return self.timers.pop().map(|t| t.task);
        }
        None
    }

    /// Take the callbacks for the frame being rendered now
    pub fn take_frame(&mut self) -> Vec<T> {
        std::mem::take(&mut self.frame)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frame.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_timers_run_in_due_then_fifo_order() {
        let mut s = Scheduler::new();
        s.set_timeout(ms(100), "b");
        s.set_timeout(ms(50), "a");
        s.set_timeout(ms(100), "c");

        s.advance_to(ms(60));
        assert_eq!(s.pop_due(), Some("a"));
        assert_eq!(s.pop_due(), None);

        s.advance_to(ms(100));
        assert_eq!(s.pop_due(), Some("b"));
        assert_eq!(s.pop_due(), Some("c"));
        assert_eq!(s.pending_timers(), 0);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut s: Scheduler<()> = Scheduler::new();
        s.advance_to(ms(100));
        s.advance_to(ms(40));
        assert_eq!(s.now(), ms(100));
    }

    #[test]
    fn test_frame_requests_during_frame_wait() {
        let mut s = Scheduler::new();
        s.request_animation_frame(1);
        let frame = s.take_frame();
        s.request_animation_frame(2);
        assert_eq!(frame, vec![1]);
        assert_eq!(s.take_frame(), vec![2]);
    }
}
