//! Unified error types for the DripGate firmware.
//!
//! A single `Error` enum that every fallible subsystem converts into,
//! keeping the boot path's error handling uniform.  All variants are
//! `Copy` so they can be passed around without allocation.  Steady-state
//! operation is infallible by construction — events are voltage facts,
//! not requests — so the only producers are boot-time validation and
//! peripheral init.

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
