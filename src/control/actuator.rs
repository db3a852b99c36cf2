//! Valve actuator — the only component that issues the physical valve
//! write.
//!
//! Tracks the commanded state and forwards a hardware write through
//! [`ValvePort`] only on an actual Open↔Closed transition, so repeated
//! or re-entrant commands cost nothing.  Opening is gated by the
//! [`DebounceClock`]; closing is unconditional and arms it.
//!
//! The commanded state defaults to Closed and the pin is driven low
//! during peripheral init, so state and hardware agree from the first
//! instruction — loss of commanded state always fails toward "not
//! watering".

use log::debug;

use crate::app::ports::ValvePort;
use crate::control::debounce::DebounceClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveState {
    Open,
    Closed,
}

pub struct ValveActuator {
    state: ValveState,
    /// Dwell armed on every close, in wake ticks.
    delay_ticks: u16,
}

impl ValveActuator {
    pub fn new(delay_ticks: u16) -> Self {
        Self {
            state: ValveState::Closed,
            delay_ticks,
        }
    }

    /// Open the valve if it is closed and the reopen gate is idle.
    /// Returns `true` iff a hardware write was issued.
    pub fn open(&mut self, valve: &mut impl ValvePort, gate: &DebounceClock) -> bool {
        if self.state != ValveState::Closed {
            return false;
        }
        if !gate.is_idle() {
            debug!("open suppressed: {} tick(s) of dwell left", gate.remaining());
            return false;
        }
        valve.set_valve(true);
        self.state = ValveState::Open;
        true
    }

    /// Open regardless of the gate.  Startup-probe path only: first
    /// initialization is not a rapid re-cycle, so the dwell does not
    /// apply.  Still idempotent.
    pub fn force_open(&mut self, valve: &mut impl ValvePort) -> bool {
        if self.state != ValveState::Closed {
            return false;
        }
        valve.set_valve(true);
        self.state = ValveState::Open;
        true
    }

    /// Close the valve if it is open, and arm the reopen gate.
    /// Returns `true` iff a hardware write was issued.
    pub fn close(&mut self, valve: &mut impl ValvePort, gate: &DebounceClock) -> bool {
        if self.state != ValveState::Open {
            return false;
        }
        valve.set_valve(false);
        self.state = ValveState::Closed;
        gate.arm(self.delay_ticks);
        true
    }

    pub fn state(&self) -> ValveState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ValveState::Open
    }
}
