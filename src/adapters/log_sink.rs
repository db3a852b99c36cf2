//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the serial log.  This is the advisory diagnostic channel: the
//! valve-state lines are for a human with a USB cable, never an input
//! to anything.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::ValveState;

pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                state,
                armed,
                moisture,
                thresholds,
            } => info!(
                "started: valve {:?}, watching {:?}, moisture {}, band {}..{}",
                state, armed, moisture, thresholds.low, thresholds.high
            ),
            AppEvent::ValveOpened { moisture } => {
                info!("valve open (moisture {})", moisture);
            }
            AppEvent::ValveClosed { moisture } => {
                info!("valve closed (moisture {})", moisture);
            }
            AppEvent::OpenSuppressed { remaining_ticks } => {
                info!("open held back: {} tick(s) of dwell left", remaining_ticks);
            }
            AppEvent::ThresholdsChanged { low, high } => {
                info!("thresholds now {}..{}", low, high);
            }
            AppEvent::Telemetry(t) => {
                let valve = match t.state {
                    ValveState::Open => "open",
                    ValveState::Closed => "closed",
                };
                debug!(
                    "telemetry: valve {}, moisture {} (avg {}), band {}..{}, dwell {}, ticks {}",
                    valve, t.moisture, t.moisture_avg, t.low, t.high, t.debounce_remaining, t.total_ticks
                );
            }
        }
    }
}
