//! GPIO / peripheral pin assignments for the DripGate controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! The moisture probe breakout carries an LM393 comparator referenced
//! against the on-board potentiometer; its digital output lands on
//! [`COMPARATOR_GPIO`] and its analog output on [`MOISTURE_ADC_GPIO`].

// ---------------------------------------------------------------------------
// Valve (IRLZ44N low-side MOSFET into the solenoid)
// ---------------------------------------------------------------------------

/// Digital output driving the valve MOSFET gate.
/// HIGH = valve open, LOW = valve closed.  The solenoid is normally
/// closed, so the power-on pin default (LOW) de-energises it.
pub const VALVE_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Capacitive soil-moisture probe, analog output.
/// ADC1 channel 2 (GPIO 2 on ESP32-C3).
pub const MOISTURE_ADC_GPIO: i32 = 2;

/// Threshold potentiometer wiper.
/// ADC1 channel 3 (GPIO 3 on ESP32-C3).
pub const REFERENCE_ADC_GPIO: i32 = 3;

/// ADC1 channel numbers (match the GPIOs above on ESP32-C3).
pub const ADC1_CH_MOISTURE: u32 = 2;
pub const ADC1_CH_REFERENCE: u32 = 3;

/// 12-bit ADC full scale.  Both the probe and the potentiometer read in
/// this range, so the reference→moisture rescale is the identity.
pub const ADC_FULL_SCALE: u16 = 4095;

// ---------------------------------------------------------------------------
// Sensors — Digital
// ---------------------------------------------------------------------------

/// LM393 comparator output from the moisture breakout.
/// Level follows moisture vs the potentiometer threshold; the edge
/// interrupt on this pin is the edge-triggered event source.
pub const COMPARATOR_GPIO: i32 = 4;
