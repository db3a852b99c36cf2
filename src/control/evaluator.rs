//! Hysteresis evaluator — decides the next valve command on every
//! threshold-crossing notification and rearms the event source for the
//! transition it now expects.
//!
//! Reading convention: a higher ADC value means wetter soil.  The two
//! edge directions follow the signal:
//!
//! * [`ArmedEdge::Rising`] — the signal crossing **up** into the wet
//!   band.  Handling it closes the valve.
//! * [`ArmedEdge::Falling`] — the signal crossing **down** into the dry
//!   band.  Handling it opens the valve (subject to the reopen gate).
//!
//! Exactly one direction is armed at any time; after each handled
//! transition the opposite direction is armed.  The sample-triggered
//! strategy has no hardware arming (its [`TriggerPort`] is a no-op) but
//! the evaluator still tracks which crossing it expects next, which
//! keeps telemetry uniform across both strategies.
//!
//! One transition is not event-driven: a dry crossing that arrives
//! while the reopen gate is up cannot re-fire once the gate releases —
//! the signal is already past the threshold.  [`Self::on_gate_released`]
//! closes that hole by re-reading the comparison on the wake tick where
//! the counter reaches zero.
//!
//! The `hw` parameter on each handler satisfies both [`ValvePort`] and
//! [`TriggerPort`] — one adapter, no double mutable borrow.

use log::{debug, info};

use crate::app::ports::{TriggerPort, ValvePort};
use crate::control::actuator::{ValveActuator, ValveState};
use crate::control::debounce::DebounceClock;
use crate::control::thresholds::Thresholds;

/// Which comparator transition the event source is configured to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmedEdge {
    /// Watching for dry → wet (signal crossing up).
    Rising,
    /// Watching for wet → dry (signal crossing down).
    Falling,
}

impl ArmedEdge {
    pub fn opposite(self) -> Self {
        match self {
            Self::Rising => Self::Falling,
            Self::Falling => Self::Rising,
        }
    }
}

/// What a single evaluation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The valve transitioned Closed → Open (one hardware write).
    Opened,
    /// The valve transitioned Open → Closed (one hardware write).
    Closed,
    /// A dry condition asked for an open but the reopen gate is up.
    OpenSuppressed { remaining_ticks: u16 },
    /// Nothing crossed a boundary, or the command was already in
    /// effect and the idempotent actuator absorbed it.
    NoChange,
}

pub struct HysteresisEvaluator {
    actuator: ValveActuator,
    armed: ArmedEdge,
}

impl HysteresisEvaluator {
    /// The evaluator comes up closed and watching the dry edge; the
    /// startup probe replaces both with ground truth before any event
    /// is processed.
    pub fn new(delay_ticks: u16) -> Self {
        Self {
            actuator: ValveActuator::new(delay_ticks),
            armed: ArmedEdge::Falling,
        }
    }

    // ── Startup ───────────────────────────────────────────────

    /// One synchronous comparison to establish which side of the
    /// threshold the soil is on right now.  Skipping this would either
    /// miss the state that already holds at boot, or arm an edge that
    /// cannot fire because the signal is already past it.
    pub fn startup_probe(
        &mut self,
        moisture: u16,
        thresholds: Thresholds,
        hw: &mut (impl ValvePort + TriggerPort),
        gate: &DebounceClock,
    ) -> Outcome {
        if moisture < thresholds.low {
            // Dry at boot: open right away.  First initialization is
            // not a rapid re-cycle, so the reopen gate does not apply.
            self.actuator.force_open(hw);
            self.arm(ArmedEdge::Rising, hw);
            info!(
                "probe: moisture {} < low {} — opening, watching wet edge",
                moisture, thresholds.low
            );
            Outcome::Opened
        } else {
            // Wet side: the pin already sits at the closed level from
            // peripheral init; the idempotent close keeps commanded
            // state and hardware in agreement without a second write.
            self.actuator.close(hw, gate);
            self.arm(ArmedEdge::Falling, hw);
            info!(
                "probe: moisture {} >= low {} — staying closed, watching dry edge",
                moisture, thresholds.low
            );
            Outcome::NoChange
        }
    }

    // ── Steady state: edge-triggered ──────────────────────────

    /// Handle an edge notification from the comparator.
    ///
    /// A stale edge for the direction that is no longer armed can
    /// still be queued (the interrupt stays armed until we rearm
    /// here); the idempotent actuator absorbs it.
    pub fn on_edge(
        &mut self,
        edge: ArmedEdge,
        hw: &mut (impl ValvePort + TriggerPort),
        gate: &DebounceClock,
    ) -> Outcome {
        if edge != self.armed {
            debug!("edge {:?} while {:?} armed — stale notification", edge, self.armed);
        }
        match edge {
            ArmedEdge::Rising => {
                // Soil reached the wet band: close now, watch for drying.
                let wrote = self.actuator.close(hw, gate);
                self.arm(ArmedEdge::Falling, hw);
                if wrote { Outcome::Closed } else { Outcome::NoChange }
            }
            ArmedEdge::Falling => {
                // Soil fell into the dry band: open unless the gate is
                // up.  Either way the next observable crossing is
                // upward, so arm the wet edge.
                let wrote = self.actuator.open(hw, gate);
                self.arm(ArmedEdge::Rising, hw);
                if wrote {
                    Outcome::Opened
                } else if self.actuator.state() == ValveState::Closed {
                    Outcome::OpenSuppressed {
                        remaining_ticks: gate.remaining(),
                    }
                } else {
                    Outcome::NoChange
                }
            }
        }
    }

    // ── Steady state: sample-triggered ────────────────────────

    /// Re-run the full comparison on a change notification.  Changes
    /// that do not cross either boundary fall through as no-ops.
    pub fn on_sample(
        &mut self,
        moisture: u16,
        thresholds: Thresholds,
        hw: &mut (impl ValvePort + TriggerPort),
        gate: &DebounceClock,
    ) -> Outcome {
        match self.actuator.state() {
            ValveState::Closed if moisture < thresholds.low => {
                let wrote = self.actuator.open(hw, gate);
                self.arm(ArmedEdge::Rising, hw);
                if wrote {
                    Outcome::Opened
                } else {
                    Outcome::OpenSuppressed {
                        remaining_ticks: gate.remaining(),
                    }
                }
            }
            ValveState::Open if moisture >= thresholds.high => {
                let wrote = self.actuator.close(hw, gate);
                self.arm(ArmedEdge::Falling, hw);
                if wrote { Outcome::Closed } else { Outcome::NoChange }
            }
            _ => Outcome::NoChange,
        }
    }

    // ── Gate release ──────────────────────────────────────────

    /// Called on the wake tick where the reopen gate reached zero.
    /// Re-reads the comparison once: if the dry condition still holds
    /// the suppressed open finally proceeds.
    pub fn on_gate_released(
        &mut self,
        moisture: u16,
        thresholds: Thresholds,
        hw: &mut (impl ValvePort + TriggerPort),
        gate: &DebounceClock,
    ) -> Outcome {
        if self.actuator.state() == ValveState::Closed && moisture < thresholds.low {
            let wrote = self.actuator.open(hw, gate);
            self.arm(ArmedEdge::Rising, hw);
            if wrote {
                info!("dwell over, still dry ({} < {}) — opening", moisture, thresholds.low);
                return Outcome::Opened;
            }
        }
        Outcome::NoChange
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn valve_state(&self) -> ValveState {
        self.actuator.state()
    }

    pub fn armed(&self) -> ArmedEdge {
        self.armed
    }

    // ── Internal ──────────────────────────────────────────────

    fn arm(&mut self, edge: ArmedEdge, trigger: &mut impl TriggerPort) {
        self.armed = edge;
        trigger.arm(edge);
    }
}
