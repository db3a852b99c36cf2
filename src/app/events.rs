//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  The adapter on the
//! other side decides what to do with them — this firmware logs them to
//! serial.  Advisory only; dropping every one of them changes nothing
//! about valve behaviour.

use crate::control::evaluator::ArmedEdge;
use crate::control::{ValveState, Thresholds};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Startup probe finished (carries the established ground truth).
    Started {
        state: ValveState,
        armed: ArmedEdge,
        moisture: u16,
        thresholds: Thresholds,
    },

    /// The valve transitioned Closed → Open.
    ValveOpened { moisture: u16 },

    /// The valve transitioned Open → Closed.
    ValveClosed { moisture: u16 },

    /// A dry condition wanted an open but the reopen gate was up.
    OpenSuppressed { remaining_ticks: u16 },

    /// The potentiometer moved; a new pair is in effect.
    ThresholdsChanged { low: u16, high: u16 },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time snapshot suitable for logging.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub state: ValveState,
    pub armed: ArmedEdge,
    pub moisture: u16,
    /// Rolling average over the last few observed readings.
    pub moisture_avg: u16,
    pub low: u16,
    pub high: u16,
    pub debounce_remaining: u16,
    pub total_ticks: u64,
}
