//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the evaluator, the cached threshold pair, and
//! the reopen gate, and maps queue events onto them.  All I/O flows
//! through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          AppService           │
//!  ValvePort ◀────│ Evaluator · Thresholds · Gate │──▶ TriggerPort
//!                 └──────────────────────────────┘
//! ```

use heapless::HistoryBuffer;
use log::info;

use crate::config::SystemConfig;
use crate::control::debounce::DebounceClock;
use crate::control::evaluator::{ArmedEdge, HysteresisEvaluator, Outcome};
use crate::control::thresholds::ThresholdStore;
use crate::control::{Thresholds, ValveState};
use crate::events::Event;

use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, SensorPort, TriggerPort, ValvePort};

/// Readings kept for the telemetry rolling average.
const HISTORY_DEPTH: usize = 16;

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    thresholds: ThresholdStore,
    gate: DebounceClock,
    evaluator: HysteresisEvaluator,
    /// Recent moisture readings (events, rechecks, telemetry reads).
    history: HistoryBuffer<u16, HISTORY_DEPTH>,
    last_moisture: u16,
    total_ticks: u64,
    ticks_since_telemetry: u16,
}

impl AppService {
    /// Construct the service.  `first_reference` is the potentiometer
    /// reading taken at boot — the threshold pair exists before the
    /// startup probe runs.
    ///
    /// Does **not** probe — call [`Self::start`] next.
    pub fn new(config: SystemConfig, first_reference: u16) -> Self {
        let thresholds = ThresholdStore::new(first_reference, config.hysteresis_percent);
        let evaluator = HysteresisEvaluator::new(config.debounce_delay_ticks());
        Self {
            config,
            thresholds,
            gate: DebounceClock::new(),
            evaluator,
            history: HistoryBuffer::new(),
            last_moisture: 0,
            total_ticks: 0,
            ticks_since_telemetry: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run the startup probe: establish which side of the threshold
    /// the soil is on, command the valve accordingly, and arm the
    /// first edge.
    pub fn start(
        &mut self,
        hw: &mut (impl SensorPort + ValvePort + TriggerPort),
        sink: &mut impl EventSink,
    ) {
        let moisture = hw.read_moisture();
        self.observe(moisture);
        let pair = self.thresholds.load();
        let _ = self
            .evaluator
            .startup_probe(moisture, pair, hw, &self.gate);

        sink.emit(&AppEvent::Started {
            state: self.evaluator.valve_state(),
            armed: self.evaluator.armed(),
            moisture,
            thresholds: pair,
        });
        info!(
            "service started: valve {:?}, watching {:?}, band {}..{}",
            self.evaluator.valve_state(),
            self.evaluator.armed(),
            pair.low,
            pair.high
        );
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Map one queue event onto the evaluator.  Runs to completion
    /// before the next event is popped, which is what keeps the
    /// valve/armed-edge/gate triple single-writer.
    pub fn handle_event(
        &mut self,
        event: Event,
        hw: &mut (impl SensorPort + ValvePort + TriggerPort),
        sink: &mut impl EventSink,
    ) {
        match event {
            Event::EdgeRising => {
                let outcome = self.evaluator.on_edge(ArmedEdge::Rising, hw, &self.gate);
                self.emit_outcome(outcome, sink);
            }
            Event::EdgeFalling => {
                let outcome = self.evaluator.on_edge(ArmedEdge::Falling, hw, &self.gate);
                self.emit_outcome(outcome, sink);
            }
            Event::MoistureChanged => {
                let moisture = hw.read_moisture();
                self.observe(moisture);
                let pair = self.thresholds.load();
                let outcome = self.evaluator.on_sample(moisture, pair, hw, &self.gate);
                self.emit_outcome(outcome, sink);
            }
            Event::ReferenceChanged => {
                let raw = hw.read_reference();
                let pair = self.thresholds.update(raw);
                sink.emit(&AppEvent::ThresholdsChanged {
                    low: pair.low,
                    high: pair.high,
                });
                info!("thresholds updated: {}..{}", pair.low, pair.high);
            }
            Event::WakeTick => self.wake_tick(hw, sink),
        }
    }

    // ── Wake cycle ────────────────────────────────────────────

    /// One light-sleep period elapsed: advance the reopen gate and, on
    /// the tick where it releases, re-check whether a suppressed open
    /// is still wanted.
    fn wake_tick(
        &mut self,
        hw: &mut (impl SensorPort + ValvePort + TriggerPort),
        sink: &mut impl EventSink,
    ) {
        self.total_ticks += 1;

        if self.gate.tick() {
            let moisture = hw.read_moisture();
            self.observe(moisture);
            let pair = self.thresholds.load();
            let outcome = self
                .evaluator
                .on_gate_released(moisture, pair, hw, &self.gate);
            self.emit_outcome(outcome, sink);
        }

        self.ticks_since_telemetry += 1;
        if self.ticks_since_telemetry >= self.config.telemetry_interval_ticks {
            self.ticks_since_telemetry = 0;
            let moisture = hw.read_moisture();
            self.observe(moisture);
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn valve_state(&self) -> ValveState {
        self.evaluator.valve_state()
    }

    pub fn armed(&self) -> ArmedEdge {
        self.evaluator.armed()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds.load()
    }

    pub fn build_telemetry(&self) -> TelemetryData {
        let pair = self.thresholds.load();
        TelemetryData {
            state: self.evaluator.valve_state(),
            armed: self.evaluator.armed(),
            moisture: self.last_moisture,
            moisture_avg: self.history_avg(),
            low: pair.low,
            high: pair.high,
            debounce_remaining: self.gate.remaining(),
            total_ticks: self.total_ticks,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn observe(&mut self, moisture: u16) {
        self.last_moisture = moisture;
        self.history.write(moisture);
    }

    fn history_avg(&self) -> u16 {
        let len = self.history.len();
        if len == 0 {
            return self.last_moisture;
        }
        let sum: u32 = self.history.oldest_ordered().map(|&m| u32::from(m)).sum();
        (sum / len as u32) as u16
    }

    fn emit_outcome(&self, outcome: Outcome, sink: &mut impl EventSink) {
        match outcome {
            Outcome::Opened => sink.emit(&AppEvent::ValveOpened {
                moisture: self.last_moisture,
            }),
            Outcome::Closed => sink.emit(&AppEvent::ValveClosed {
                moisture: self.last_moisture,
            }),
            Outcome::OpenSuppressed { remaining_ticks } => {
                sink.emit(&AppEvent::OpenSuppressed { remaining_ticks });
            }
            Outcome::NoChange => {}
        }
    }
}
