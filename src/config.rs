//! System configuration parameters
//!
//! All tunable parameters for the DripGate controller.  There is no
//! persistent store on this board (the controller is stateless across
//! power loss), so values come from the compile-time defaults below.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How threshold-crossing notifications reach the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerStrategy {
    /// Edge-qualified interrupts from the comparator pin.  One edge
    /// direction armed at a time; no redundant wakeups on noise that
    /// stays on one side of the threshold.
    EdgeTriggered,
    /// Re-evaluate on any change of the moisture or reference sample.
    /// Used when the board has no comparator routed to a GPIO.
    SampleTriggered,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Hysteresis ---
    /// Hysteresis inflation applied to the low threshold, in percent.
    /// `high = max(low + 1, low + low * hysteresis_percent / 100)`.
    pub hysteresis_percent: u8,

    // --- Debounce ---
    /// Minimum dwell in the closed state before a reopen is permitted
    /// (seconds).  Quantised up to whole wake periods.
    pub debounce_delay_secs: u16,

    // --- Timing ---
    /// Light-sleep interval between wake ticks (seconds).  This is the
    /// debounce tick unit; the reopen delay is only as fine as it.
    pub wake_period_secs: u16,
    /// Telemetry snapshot cadence, in wake ticks.
    pub telemetry_interval_ticks: u16,

    // --- Event source ---
    /// Which notification strategy drives the evaluator.
    pub trigger: TriggerStrategy,
    /// Minimum ADC delta for a moisture reading to count as "changed"
    /// (sample strategy only).
    pub sample_deadband: u16,
    /// Minimum ADC delta for a potentiometer reading to count as moved.
    pub reference_deadband: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Hysteresis
            hysteresis_percent: 1,

            // Debounce
            debounce_delay_secs: 60,

            // Timing
            wake_period_secs: 8,
            telemetry_interval_ticks: 75, // ~10 min at 8 s ticks

            // Event source
            trigger: TriggerStrategy::EdgeTriggered,
            sample_deadband: 16,
            reference_deadband: 16,
        }
    }
}

impl SystemConfig {
    /// Reopen delay expressed in wake ticks, rounded up so the dwell is
    /// never shorter than `debounce_delay_secs`.
    pub fn debounce_delay_ticks(&self) -> u16 {
        self.debounce_delay_secs.div_ceil(self.wake_period_secs.max(1))
    }

    /// Range-check every field.  Called once at boot; a failure falls
    /// back to `Self::default()`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.hysteresis_percent == 0 || self.hysteresis_percent > 50 {
            return Err(Error::Config("hysteresis_percent out of range (1-50)"));
        }
        if self.wake_period_secs == 0 || self.wake_period_secs > 60 {
            return Err(Error::Config("wake_period_secs out of range (1-60)"));
        }
        if self.debounce_delay_secs == 0 {
            return Err(Error::Config("debounce_delay_secs must be non-zero"));
        }
        if self.telemetry_interval_ticks == 0 {
            return Err(Error::Config("telemetry_interval_ticks must be non-zero"));
        }
        Ok(())
    }
}
