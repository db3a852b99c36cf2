//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the DripGate controller:
//! the [`AppService`](service::AppService) orchestrates the hysteresis
//! evaluator over the port traits in [`ports`], and emits structured
//! [`events`] through the sink port.  Everything here compiles and
//! tests on the host.

pub mod events;
pub mod ports;
pub mod service;
