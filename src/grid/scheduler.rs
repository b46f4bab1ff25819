//! Tick scheduling for the Game-of-Life simulation.
//!
//! The clock is a small {Stopped, Running} state machine polled from the
//! main event loop; no timer thread exists. Stopping discards the pending
//! deadline, so no tick can fire after `stop` returns.

use std::time::{Duration, Instant};

/// Floor on the tick interval. Sub-minimum requests are silently raised to
/// this value rather than rejected; a shorter interval would just saturate
/// the event loop.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Stopped,
    Running { next_tick: Instant },
}

/// Drives periodic generation advances at a configurable interval.
#[derive(Debug, Clone)]
pub struct LifeClock {
    state: ClockState,
    interval: Duration,
}

impl LifeClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: ClockState::Stopped,
            interval: interval.max(MIN_TICK_INTERVAL),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts the loop with the first tick due one interval from `now`.
    /// Idempotent: calling while running leaves the pending deadline alone.
    pub fn start(&mut self, now: Instant) {
        if !self.is_running() {
            self.state = ClockState::Running {
                next_tick: now + self.interval,
            };
        }
    }

    /// Stops the loop and cancels the pending tick. Idempotent.
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
    }

    /// Whether a manual single step is allowed. Stepping is disabled while
    /// the loop runs so a step never races a scheduled tick.
    pub fn can_step(&self) -> bool {
        !self.is_running()
    }

    /// Adjusts the interval, silently flooring sub-minimum values.
    ///
    /// Takes effect from the next scheduled tick; a pending deadline is not
    /// rescheduled.
    pub fn set_interval(&mut self, interval: Duration) {
        if interval < MIN_TICK_INTERVAL {
            tracing::debug!(
                requested_ms = interval.as_millis() as u64,
                "tick interval floored to minimum"
            );
        }
        self.interval = interval.max(MIN_TICK_INTERVAL);
    }

    /// Polls the clock. Returns true when a tick is due, advancing the
    /// deadline by one interval from `now`. Never true while stopped.
    pub fn tick_due(&mut self, now: Instant) -> bool {
        match self.state {
            ClockState::Running { next_tick } if now >= next_tick => {
                self.state = ClockState::Running {
                    next_tick: now + self.interval,
                };
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> LifeClock {
        LifeClock::new(Duration::from_millis(100))
    }

    #[test]
    fn test_stopped_clock_never_ticks() {
        let mut clock = clock();
        let now = Instant::now();
        assert!(!clock.tick_due(now + Duration::from_secs(60)));
    }

    #[test]
    fn test_tick_fires_after_interval() {
        let mut clock = clock();
        let start = Instant::now();
        clock.start(start);
        assert!(!clock.tick_due(start + Duration::from_millis(99)));
        assert!(clock.tick_due(start + Duration::from_millis(100)));
        // The deadline advanced; the same instant does not fire twice.
        assert!(!clock.tick_due(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut clock = clock();
        let start = Instant::now();
        clock.start(start);
        // A second start must not push the pending deadline back.
        clock.start(start + Duration::from_millis(90));
        assert!(clock.tick_due(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let mut clock = clock();
        let start = Instant::now();
        clock.start(start);
        clock.stop();
        assert!(!clock.tick_due(start + Duration::from_secs(10)));
        // Stopping again is harmless.
        clock.stop();
        assert!(!clock.is_running());
    }

    #[test]
    fn test_step_only_while_stopped() {
        let mut clock = clock();
        assert!(clock.can_step());
        clock.start(Instant::now());
        assert!(!clock.can_step());
        clock.stop();
        assert!(clock.can_step());
    }

    #[test]
    fn test_interval_floor() {
        let mut clock = LifeClock::new(Duration::from_millis(1));
        assert_eq!(clock.interval(), MIN_TICK_INTERVAL);
        clock.set_interval(Duration::from_millis(10));
        assert_eq!(clock.interval(), MIN_TICK_INTERVAL);
        clock.set_interval(Duration::from_millis(500));
        assert_eq!(clock.interval(), Duration::from_millis(500));
    }
}
