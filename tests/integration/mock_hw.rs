//! Mock hardware adapter for integration tests.
//!
//! Records every valve write and every arm call so tests can assert on
//! the full command history without touching real GPIO/ADC registers.

use dripgate::app::events::AppEvent;
use dripgate::app::ports::{EventSink, SensorPort, TriggerPort, ValvePort};
use dripgate::control::evaluator::ArmedEdge;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Reading handed out on the next moisture read.
    pub moisture: u16,
    /// Reading handed out on the next reference read.
    pub reference: u16,
    /// Raw valve pin writes, in order (`true` = energise).
    pub writes: Vec<bool>,
    /// Every arm call, in order.
    pub armed: Vec<ArmedEdge>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(moisture: u16, reference: u16) -> Self {
        Self {
            moisture,
            reference,
            writes: Vec::new(),
            armed: Vec::new(),
        }
    }

    /// Pin level after the last write (`false` = closed, the power-on
    /// default).
    pub fn valve_open(&self) -> bool {
        self.writes.last().copied().unwrap_or(false)
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn last_armed(&self) -> Option<ArmedEdge> {
        self.armed.last().copied()
    }
}

impl SensorPort for MockHardware {
    fn read_moisture(&mut self) -> u16 {
        self.moisture
    }

    fn read_reference(&mut self) -> u16 {
        self.reference
    }
}

impl ValvePort for MockHardware {
    fn set_valve(&mut self, open: bool) {
        self.writes.push(open);
    }
}

impl TriggerPort for MockHardware {
    fn arm(&mut self, edge: ArmedEdge) {
        self.armed.push(edge);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn opened_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::ValveOpened { .. }))
            .count()
    }

    pub fn closed_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::ValveClosed { .. }))
            .count()
    }

    pub fn suppressed_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::OpenSuppressed { .. }))
            .count()
    }

    pub fn telemetry_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Telemetry(_)))
            .count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
