//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter             | Implements                              | Connects to            |
//! |---------------------|------------------------------------------|------------------------|
//! | [`HardwareAdapter`] | `SensorPort` + `ValvePort` + `TriggerPort` | ADC, valve GPIO, ISR |
//! | [`LogEventSink`]    | `EventSink`                              | serial log             |
//!
//! [`HardwareAdapter`]: hardware::HardwareAdapter
//! [`LogEventSink`]: log_sink::LogEventSink

pub mod hardware;
pub mod log_sink;
