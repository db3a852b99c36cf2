//! Sensor subsystem — individual drivers and the aggregating
//! [`SensorHub`].
//!
//! The hub owns both analog inputs and is the single place the wake
//! loop polls for change notifications; the hardware adapter forwards
//! the port-level reads to it.

pub mod moisture;
pub mod reference;

use moisture::MoistureSensor;
use reference::ReferenceInput;

pub struct SensorHub {
    moisture: MoistureSensor,
    reference: ReferenceInput,
}

impl SensorHub {
    pub fn new(moisture: MoistureSensor, reference: ReferenceInput) -> Self {
        Self {
            moisture,
            reference,
        }
    }

    pub fn read_moisture(&mut self) -> u16 {
        self.moisture.read()
    }

    pub fn read_reference(&mut self) -> u16 {
        self.reference.read()
    }

    /// Sample-strategy change detection; `None` when the reading has
    /// not moved beyond the deadband since the last notification.
    pub fn poll_moisture_changed(&mut self, deadband: u16) -> Option<u16> {
        self.moisture.poll_changed(deadband)
    }

    /// Pot-movement detection, used by both strategies.
    pub fn poll_reference_changed(&mut self, deadband: u16) -> Option<u16> {
        self.reference.poll_changed(deadband)
    }
}
