//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, the valve pin, the comparator interrupt,
//! event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::control::evaluator::ArmedEdge;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain raw ADC readings.
pub trait SensorPort {
    /// Current soil-moisture reading, 0 – full scale.
    fn read_moisture(&mut self) -> u16;

    /// Current threshold-potentiometer reading, same range.
    fn read_reference(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Valve port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the one physical valve write.
///
/// Only [`ValveActuator`](crate::control::actuator::ValveActuator)
/// calls this, and only on an actual state transition.
pub trait ValvePort {
    /// Drive the valve output pin.  `true` = energise (open),
    /// `false` = de-energise (the normally-closed resting state).
    fn set_valve(&mut self, open: bool);
}

// ───────────────────────────────────────────────────────────────
// Trigger port (driven adapter: domain → event source)
// ───────────────────────────────────────────────────────────────

/// The single capability of the event-source boundary: configure which
/// transition direction will be reported next.
///
/// The comparator-backed implementation reprograms the GPIO interrupt
/// edge; the sample-backed implementation is a no-op, because a
/// change-notification source has no direction to select.  Both are
/// interchangeable behind this trait and chosen at configuration time.
pub trait TriggerPort {
    fn arm(&mut self, edge: ArmedEdge);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / diagnostics)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go — the serial log
/// in this firmware; the channel is advisory and never part of the
/// control contract.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
