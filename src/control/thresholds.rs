//! Cached low/high moisture thresholds.
//!
//! The pair is derived from the threshold potentiometer and replaced
//! wholesale on every potentiometer-change notification.  Readers run
//! in the main loop while the update handler may run from any wake
//! context, so the store hands out the pair through a critical-section
//! mutex: a reader observes either the old pair or the new pair, never
//! a torn mix of low and high from different updates.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::pins;

/// A low/high pair in the moisture sensor's reading range.
/// Invariant: `high > low`, always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub low: u16,
    pub high: u16,
}

impl Thresholds {
    /// Derive a pair from a raw potentiometer reading.
    ///
    /// The reference input reads in the same 12-bit range as the
    /// moisture probe, so the linear rescale is the identity (clamped
    /// to full scale).  `high` is `low` inflated by the hysteresis
    /// percentage, floored to `low + 1` so the band never collapses.
    pub fn derive(raw_reference: u16, hysteresis_percent: u8) -> Self {
        let low = raw_reference.min(pins::ADC_FULL_SCALE);
        let inflated = u32::from(low) * (100 + u32::from(hysteresis_percent)) / 100;
        let high = (inflated as u16).max(low + 1);
        Self { low, high }
    }
}

/// Holder for the current pair.  Written only by the reference-change
/// handler; read by the evaluator.
pub struct ThresholdStore {
    pair: Mutex<CriticalSectionRawMutex, Cell<Thresholds>>,
    hysteresis_percent: u8,
}

impl ThresholdStore {
    /// Build the store from the first reference reading taken at boot.
    pub fn new(raw_reference: u16, hysteresis_percent: u8) -> Self {
        let pair = Thresholds::derive(raw_reference, hysteresis_percent);
        Self {
            pair: Mutex::new(Cell::new(pair)),
            hysteresis_percent,
        }
    }

    /// Replace the stored pair from a new reference reading.
    /// Returns the pair that is now in effect.
    pub fn update(&self, raw_reference: u16) -> Thresholds {
        let next = Thresholds::derive(raw_reference, self.hysteresis_percent);
        self.pair.lock(|cell| cell.set(next));
        next
    }

    /// The pair currently in effect.
    pub fn load(&self) -> Thresholds {
        self.pair.lock(Cell::get)
    }
}
