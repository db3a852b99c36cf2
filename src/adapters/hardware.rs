//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the valve driver, exposing them through
//! [`SensorPort`] / [`ValvePort`] / [`TriggerPort`] so the service
//! never touches a GPIO directly.
//!
//! The trigger half is pluggable: [`ComparatorTrigger`] reprograms the
//! comparator interrupt edge, [`SampleTrigger`] does nothing.  They are
//! the two interchangeable implementations of the "arm next edge"
//! capability — the generic parameter is fixed once in `main` from the
//! configured strategy.

use crate::app::ports::{SensorPort, TriggerPort, ValvePort};
use crate::control::evaluator::ArmedEdge;
use crate::drivers::hw_init;
use crate::drivers::valve::ValveDriver;
use crate::sensors::SensorHub;

// ── Trigger implementations ───────────────────────────────────

/// Edge-triggered strategy: arming selects which comparator transition
/// the GPIO interrupt reports next.
pub struct ComparatorTrigger;

impl TriggerPort for ComparatorTrigger {
    fn arm(&mut self, edge: ArmedEdge) {
        hw_init::arm_comparator_edge(edge);
    }
}

/// Sample-triggered strategy: change notifications carry no direction,
/// so there is nothing to arm.
pub struct SampleTrigger;

impl TriggerPort for SampleTrigger {
    fn arm(&mut self, _edge: ArmedEdge) {}
}

// ── HardwareAdapter ───────────────────────────────────────────

pub struct HardwareAdapter<T: TriggerPort> {
    sensors: SensorHub,
    valve: ValveDriver,
    trigger: T,
}

impl<T: TriggerPort> HardwareAdapter<T> {
    pub fn new(sensors: SensorHub, valve: ValveDriver, trigger: T) -> Self {
        Self {
            sensors,
            valve,
            trigger,
        }
    }

    /// Wake-loop polling access to the sensor hub (change detection
    /// lives there, not behind the ports).
    pub fn sensors_mut(&mut self) -> &mut SensorHub {
        &mut self.sensors
    }
}

impl<T: TriggerPort> SensorPort for HardwareAdapter<T> {
    fn read_moisture(&mut self) -> u16 {
        self.sensors.read_moisture()
    }

    fn read_reference(&mut self) -> u16 {
        self.sensors.read_reference()
    }
}

impl<T: TriggerPort> ValvePort for HardwareAdapter<T> {
    fn set_valve(&mut self, open: bool) {
        self.valve.set(open);
    }
}

impl<T: TriggerPort> TriggerPort for HardwareAdapter<T> {
    fn arm(&mut self, edge: ArmedEdge) {
        self.trigger.arm(edge);
    }
}
