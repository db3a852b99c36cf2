//! Threshold potentiometer (analog channel).
//!
//! The wiper voltage is the operator's setpoint.  It is read once at
//! boot to seed the threshold store and then re-read on wake to detect
//! pot movement; a move beyond the deadband becomes a
//! reference-changed notification.  The cached threshold pair is the
//! only thing the evaluator ever compares against — the pot is never
//! consulted live during a decision.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the real ADC channel via hw_init helpers.
//! On host/test: reads a simulated value settable from tests.

use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

static SIM_REFERENCE: AtomicU16 = AtomicU16::new(1500);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_reference(raw: u16) {
    SIM_REFERENCE.store(raw, Ordering::Relaxed);
}

pub struct ReferenceInput {
    _gpio: i32,
    /// Reading at the last emitted change notification.
    baseline: u16,
}

impl ReferenceInput {
    pub fn new(gpio: i32) -> Self {
        Self {
            _gpio: gpio,
            baseline: 0,
        }
    }

    /// One synchronous ADC read.  Also resets the change-detection
    /// baseline — a caller that just consumed the value has, by
    /// definition, been notified of it.
    pub fn read(&mut self) -> u16 {
        let now = self.read_raw();
        self.baseline = now;
        now
    }

    /// Wake-time pot-movement detection.  Reports `Some(reading)` when
    /// the wiper moved beyond `deadband` from the last notified
    /// position.
    pub fn poll_changed(&mut self, deadband: u16) -> Option<u16> {
        let now = self.read_raw();
        if now.abs_diff(self.baseline) > deadband {
            self.baseline = now;
            Some(now)
        } else {
            None
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&self) -> u16 {
        hw_init::adc1_read(pins::ADC1_CH_REFERENCE)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&self) -> u16 {
        SIM_REFERENCE.load(Ordering::Relaxed)
    }
}
