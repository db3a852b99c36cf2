//! DripGate Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution and light-sleep
//! parking.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter                LogEventSink                 │
//! │  (Sensor+Valve+Trigger ports)   (EventSink)                  │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ────────────────        │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │           AppService (pure logic)                  │      │
//! │  │  HysteresisEvaluator · ThresholdStore · Gate       │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  Event queue (ISR → main) · PowerManager (light sleep)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Boot order matters: the valve pin goes low inside peripheral init,
//! the ISR service is installed before the startup probe arms the
//! first edge (so no crossing can slip into the gap), and only then
//! does the wake loop start.
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod diagnostics;
mod error;
mod events;
mod pins;
mod power;

pub mod app;
mod adapters;
pub mod control;
mod drivers;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info};

use adapters::hardware::{ComparatorTrigger, HardwareAdapter, SampleTrigger};
use adapters::log_sink::LogEventSink;
use app::ports::{SensorPort, TriggerPort};
use app::service::AppService;
use config::{SystemConfig, TriggerStrategy};
use control::evaluator::ArmedEdge;
use drivers::valve::ValveDriver;
use events::Event;
use power::{PowerManager, WakeReason};
use sensors::moisture::MoistureSensor;
use sensors::reference::ReferenceInput;
use sensors::SensorHub;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("DripGate v{}", env!("CARGO_PKG_VERSION"));
    diagnostics::install_panic_handler();

    // ── 2. Peripherals — valve pin is driven low in here, before
    //       any control logic can run ─────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical, but the valve pin
        // defaults low, so a halted board is a closed valve.
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    if let Err(e) = config.validate() {
        error!("built-in config rejected: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    info!(
        "config: {:?} strategy, wake {}s, dwell {}s ({} ticks)",
        config.trigger,
        config.wake_period_secs,
        config.debounce_delay_secs,
        config.debounce_delay_ticks()
    );

    // ── 4. ISR service before the probe arms anything ─────────
    if let Err(e) = drivers::hw_init::init_isr_service() {
        error!("ISR service init failed: {} — continuing without edge events", e);
    }

    // ── 5. Wire the adapter for the configured strategy ───────
    let hub = SensorHub::new(
        MoistureSensor::new(pins::MOISTURE_ADC_GPIO),
        ReferenceInput::new(pins::REFERENCE_ADC_GPIO),
    );
    let valve = ValveDriver::new();

    match config.trigger {
        TriggerStrategy::EdgeTriggered => {
            run(HardwareAdapter::new(hub, valve, ComparatorTrigger), config)
        }
        TriggerStrategy::SampleTriggered => {
            run(HardwareAdapter::new(hub, valve, SampleTrigger), config)
        }
    }
}

// ── Wake loop ─────────────────────────────────────────────────

fn run<T: TriggerPort>(mut hw: HardwareAdapter<T>, config: SystemConfig) -> ! {
    let mut sink = LogEventSink::new();

    // The threshold store is seeded from the first reference reading;
    // the probe then establishes valve state and the first armed edge.
    let first_reference = hw.read_reference();
    let mut service = AppService::new(config.clone(), first_reference);
    service.start(&mut hw, &mut sink);

    let power = PowerManager::new(&config);
    info!("System ready. Entering wake loop.");

    loop {
        match power.park() {
            WakeReason::Timer | WakeReason::Other => {
                // One wake period elapsed: this is the debounce tick.
                events::push_event(Event::WakeTick);
            }
            WakeReason::Comparator => {
                // The crossing happened while the chip slept, so no
                // ISR ran; reconstruct the event from the armed edge.
                let event = match drivers::hw_init::armed_edge() {
                    ArmedEdge::Rising => Event::EdgeRising,
                    ArmedEdge::Falling => Event::EdgeFalling,
                };
                events::push_event(event);
            }
        }

        // Potentiometer movement is checked on every wake in both
        // strategies; the thresholds are sampled-and-cached.
        if hw
            .sensors_mut()
            .poll_reference_changed(config.reference_deadband)
            .is_some()
        {
            events::push_event(Event::ReferenceChanged);
        }

        if config.trigger == TriggerStrategy::SampleTriggered
            && hw
                .sensors_mut()
                .poll_moisture_changed(config.sample_deadband)
                .is_some()
        {
            events::push_event(Event::MoistureChanged);
        }

        // Process all pending events (ISR-queued ones included).
        events::drain_events(|event| service.handle_event(event, &mut hw, &mut sink));
    }
}
