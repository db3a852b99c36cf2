//! Power management — the light-sleep wake loop.
//!
//! Between events the processor parks in light sleep with two wake
//! sources: the timer at the configured wake period, and (with the
//! edge strategy) the comparator pin.  Interrupt handlers cannot run
//! while the chip sleeps, so a comparator crossing is reported as a
//! GPIO wake *cause*; the main loop translates that into the armed
//! edge event on resume.  Crossings that happen while the chip is
//! awake go through the normal GPIO ISR instead.
//!
//! Only timer wakes count as debounce ticks — the dwell is defined in
//! whole wake periods, and an event wake is not a wake period.
//!
//! On the host the sleep degrades to `thread::sleep`, which keeps the
//! full wake loop runnable in simulation.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::debug;

use crate::config::{SystemConfig, TriggerStrategy};
#[cfg(target_os = "espidf")]
use crate::control::evaluator::ArmedEdge;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Why the last light sleep ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    /// The wake period elapsed.
    Timer,
    /// The comparator pin crossed while sleeping (edge strategy only).
    Comparator,
    /// Anything else the SoC reports (treated like a timer wake).
    Other,
}

pub struct PowerManager {
    wake_period_secs: u16,
    /// Arm the comparator pin as a wake source (edge strategy).
    gpio_wake: bool,
}

impl PowerManager {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            wake_period_secs: config.wake_period_secs,
            gpio_wake: config.trigger == TriggerStrategy::EdgeTriggered,
        }
    }

    /// Park in light sleep until the wake period elapses or the
    /// comparator crosses.  Returns why we are awake.
    #[cfg(target_os = "espidf")]
    pub fn park(&self) -> WakeReason {
        // SAFETY: sleep configuration calls are main-loop only; the
        // wake sources touched here are re-armed on every park.
        unsafe {
            esp_sleep_enable_timer_wakeup(u64::from(self.wake_period_secs) * 1_000_000);

            if self.gpio_wake {
                // Light-sleep GPIO wake is level-qualified.  Waking on
                // the level the armed edge leads *to* makes it an edge
                // wake: if the pin is already there, the crossing has
                // happened and the sleep returns immediately.
                let level = match hw_init::armed_edge() {
                    ArmedEdge::Rising => gpio_int_type_t_GPIO_INTR_HIGH_LEVEL,
                    ArmedEdge::Falling => gpio_int_type_t_GPIO_INTR_LOW_LEVEL,
                };
                gpio_wakeup_enable(pins::COMPARATOR_GPIO, level);
                esp_sleep_enable_gpio_wakeup();
            }

            esp_light_sleep_start();

            if self.gpio_wake {
                // gpio_wakeup_enable overwrote the interrupt type;
                // restore the armed edge for the awake stretch.
                hw_init::arm_comparator_edge(hw_init::armed_edge());
            }

            let reason = match esp_sleep_get_wakeup_cause() {
                esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER => WakeReason::Timer,
                esp_sleep_source_t_ESP_SLEEP_WAKEUP_GPIO => WakeReason::Comparator,
                _ => WakeReason::Other,
            };
            debug!("woke: {:?}", reason);
            reason
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn park(&self) -> WakeReason {
        std::thread::sleep(std::time::Duration::from_secs(u64::from(
            self.wake_period_secs,
        )));
        debug!("woke(sim): timer, gpio_wake={}", self.gpio_wake);
        WakeReason::Timer
    }
}
