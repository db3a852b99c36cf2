//! Control core — the hysteresis/debounce state machine.
//!
//! Everything with an invariant lives here: the cached threshold pair,
//! the reopen gate, the idempotent valve actuator, and the evaluator
//! that ties them together.  The modules are pure logic over the port
//! traits in [`crate::app::ports`]; no hardware access.

pub mod actuator;
pub mod debounce;
pub mod evaluator;
pub mod thresholds;

pub use actuator::{ValveActuator, ValveState};
pub use debounce::DebounceClock;
pub use evaluator::{ArmedEdge, HysteresisEvaluator, Outcome};
pub use thresholds::{ThresholdStore, Thresholds};
