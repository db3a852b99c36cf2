//! Reopen gate — the debounce tick counter.
//!
//! A close arms the counter; every light-sleep wake decrements it by
//! exactly one, floored at zero.  While it is non-zero the actuator
//! refuses to reopen, which is what biases the controller toward the
//! closed position: closing is always immediate, reopening waits out
//! the dwell.  The delay is counted in wake periods, not wall time —
//! on this platform the wake period is the finest clock available in
//! the low-power state, so the dwell is deliberately coarse.
//!
//! The close path and the wake ticker run in different contexts, so
//! the counter is a single atomic.

use core::sync::atomic::{AtomicU16, Ordering};

pub struct DebounceClock {
    remaining: AtomicU16,
}

impl DebounceClock {
    /// Starts idle: nothing has closed yet, so nothing gates an open.
    pub const fn new() -> Self {
        Self {
            remaining: AtomicU16::new(0),
        }
    }

    /// Arm the gate.  Called only from the actuator's close path.
    pub fn arm(&self, ticks: u16) {
        self.remaining.store(ticks, Ordering::Release);
    }

    /// Advance one wake period.  Returns `true` on the tick where the
    /// counter reaches zero — the caller uses that edge to re-check
    /// whether a suppressed open is still wanted.
    pub fn tick(&self) -> bool {
        let prev = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_sub(1));
        matches!(prev, Ok(1))
    }

    /// True when no dwell is pending and an open may proceed.
    pub fn is_idle(&self) -> bool {
        self.remaining.load(Ordering::Acquire) == 0
    }

    /// Ticks left before the gate releases.
    pub fn remaining(&self) -> u16 {
        self.remaining.load(Ordering::Acquire)
    }
}

impl Default for DebounceClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let clock = DebounceClock::new();
        assert!(clock.is_idle());
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn tick_floors_at_zero() {
        let clock = DebounceClock::new();
        assert!(!clock.tick());
        assert!(!clock.tick());
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn arm_then_count_down() {
        let clock = DebounceClock::new();
        clock.arm(3);
        assert!(!clock.is_idle());

        assert!(!clock.tick()); // 3 → 2
        assert!(!clock.tick()); // 2 → 1
        assert!(clock.tick()); // 1 → 0: gate releases on this tick
        assert!(clock.is_idle());
        assert!(!clock.tick()); // stays at 0, no second release edge
    }

    #[test]
    fn rearm_restarts_dwell() {
        let clock = DebounceClock::new();
        clock.arm(2);
        assert!(!clock.tick());
        clock.arm(2);
        assert_eq!(clock.remaining(), 2);
        assert!(!clock.tick());
        assert!(clock.tick());
    }
}
