//! Periodic timer abstraction for launch playback
//!
//! Playback ticks are requested through a `Scheduler` instead of a wall
//! clock, so tests and headless runs drive time explicitly.

use serde::{Deserialize, Serialize};

/// Identifies one scheduled periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// Source of periodic ticks
pub trait Scheduler {
    /// Start a periodic timer firing every `period` time units
    fn schedule(&mut self, period: u32) -> TimerHandle;

    /// Stop a timer. Cancelled timers never fire again.
    fn cancel(&mut self, handle: TimerHandle);

    /// Let `elapsed` time units pass; returns fired timers in firing order
    fn due(&mut self, elapsed: u32) -> Vec<TimerHandle>;
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    period: u32,
    /// Time until next fire
    remaining: u32,
}

/// Deterministic accumulator scheduler
///
/// Timers fire once per full period of elapsed time. When several timers
/// fire within one `due` call they are interleaved by firing time, ties
/// broken by creation order.
#[derive(Debug, Default)]
pub struct FixedStepScheduler {
    timers: Vec<Timer>,
    next_id: u64,
}

impl FixedStepScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Number of live timers
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl Scheduler for FixedStepScheduler {
    fn schedule(&mut self, period: u32) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let period = period.max(1);
        self.timers.push(Timer {
            handle,
            period,
            remaining: period,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }

    fn due(&mut self, elapsed: u32) -> Vec<TimerHandle> {
        let elapsed = u64::from(elapsed);
        let mut fired: Vec<(u64, TimerHandle)> = Vec::new();

        for timer in &mut self.timers {
            // u64 so the step past `elapsed` cannot overflow
            let mut offset = u64::from(timer.remaining);
            while offset <= elapsed {
                fired.push((offset, timer.handle));
                offset += u64::from(timer.period);
            }
            // At most one period remains, which fits in u32
            timer.remaining = (offset - elapsed) as u32;
        }

        // Stable sort keeps creation order for equal fire times
        fired.sort_by_key(|&(at, _)| at);
        fired.into_iter().map(|(_, h)| h).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_period() {
        let mut sched = FixedStepScheduler::new();
        let h = sched.schedule(8);

        assert!(sched.due(7).is_empty());
        assert_eq!(sched.due(1), vec![h]);
        assert_eq!(sched.due(24), vec![h, h, h]);
        assert!(sched.due(4).is_empty());
        assert_eq!(sched.due(4), vec![h]);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut sched = FixedStepScheduler::new();
        let h = sched.schedule(8);
        sched.cancel(h);
        assert!(!sched.is_active(h));
        assert!(sched.due(100).is_empty());
    }

    #[test]
    fn test_interleaves_by_fire_time() {
        let mut sched = FixedStepScheduler::new();
        let slow = sched.schedule(10);
        let fast = sched.schedule(4);
        assert_eq!(sched.due(12), vec![fast, fast, slow, fast]);
    }

    #[test]
    fn test_elapsed_near_u32_max() {
        let mut sched = FixedStepScheduler::new();
        let h = sched.schedule(1 << 31);
        assert_eq!(sched.due(u32::MAX), vec![h]);
        assert_eq!(sched.due(1), vec![h]);
        assert!(sched.due((1 << 31) - 1).is_empty());
        assert_eq!(sched.due(1), vec![h]);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut sched = FixedStepScheduler::new();
        let a = sched.schedule(8);
        sched.cancel(a);
        let b = sched.schedule(8);
        assert_ne!(a, b);
        assert_eq!(sched.active_count(), 1);
    }
}
