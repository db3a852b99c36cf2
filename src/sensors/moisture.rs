//! Capacitive soil-moisture probe (analog channel).
//!
//! Higher reading = wetter soil.  The probe shares its breakout with
//! the LM393 comparator; this driver covers only the analog path used
//! by the startup probe, the gate-release recheck, the sample-triggered
//! strategy, and telemetry.
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

static SIM_MOISTURE: AtomicU16 = AtomicU16::new(2048);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_moisture(raw: u16) {
    SIM_MOISTURE.store(raw, Ordering::Relaxed);
}

pub struct MoistureSensor {
    _gpio: i32,
    /// Reading at the last emitted change notification.
    baseline: u16,
}

impl MoistureSensor {
    pub fn new(gpio: i32) -> Self {
        Self {
            _gpio: gpio,
            baseline: 0,
        }
    }

    /// One synchronous ADC read.
    pub fn read(&mut self) -> u16 {
        self.read_raw()
    }

    /// Wake-time change detection for the sample-triggered strategy:
    /// reads once and reports `Some(reading)` when it moved beyond
    /// `deadband` from the last notified reading.  Slow drift still
    /// fires once it accumulates past the deadband, because the
    /// baseline only advances on a notification.
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
        hw_init::adc1_read(pins::ADC1_CH_MOISTURE)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&self) -> u16 {
        SIM_MOISTURE.load(Ordering::Relaxed)
    }
}
