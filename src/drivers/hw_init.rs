//! One-shot hardware peripheral initialization.
//!
//! Configures the two ADC channels, the valve output, and the
//! comparator input using raw ESP-IDF sys calls.  Called once from
//! `main()` before the event loop starts.
//!
//! The valve pin is configured and driven LOW here, before any control
//! logic runs: the solenoid is normally closed, so whatever happens
//! later the board powers up not watering.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use core::sync::atomic::{AtomicU8, Ordering};

#[cfg(target_os = "espidf")]
use log::info;

use crate::control::evaluator::ArmedEdge;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the event loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio()?;
    }
    info!("hw_init: all peripherals configured, valve pin low");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Written once in `init_adc()` before the event loop starts;
/// afterwards only read from the single main-loop context.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::ADC1_CH_MOISTURE, pins::ADC1_CH_REFERENCE] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=moisture, CH{}=reference)",
        pins::ADC1_CH_MOISTURE,
        pins::ADC1_CH_REFERENCE
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    0
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<(), HwInitError> {
    // Valve output first — LOW (closed) before anything else can run.
    let valve_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::VALVE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&valve_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::VALVE_GPIO, 0) };

    // Comparator input.  Interrupts stay disabled until the evaluator
    // arms a direction.
    let cmp_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::COMPARATOR_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cmp_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    info!("hw_init: GPIO configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio(). Main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── Comparator edge ISR ───────────────────────────────────────
//
// Exactly one interrupt direction is configured at a time.  The armed
// direction is mirrored into an atomic so the ISR knows which event to
// push without reading hardware registers.

const ARMED_RISING: u8 = 0;
const ARMED_FALLING: u8 = 1;

static ARMED_EDGE: AtomicU8 = AtomicU8::new(ARMED_FALLING);

fn armed_edge_code(edge: ArmedEdge) -> u8 {
    match edge {
        ArmedEdge::Rising => ARMED_RISING,
        ArmedEdge::Falling => ARMED_FALLING,
    }
}

/// The direction the comparator interrupt is currently armed for.
pub fn armed_edge() -> ArmedEdge {
    if ARMED_EDGE.load(Ordering::Acquire) == ARMED_RISING {
        ArmedEdge::Rising
    } else {
        ArmedEdge::Falling
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn comparator_gpio_isr(_arg: *mut core::ffi::c_void) {
    use crate::events::{push_event, Event};

    // Only one edge type is enabled in hardware, so the armed mirror
    // tells us which crossing this is.  Lock-free queue push only.
    let event = if ARMED_EDGE.load(Ordering::Acquire) == ARMED_RISING {
        Event::EdgeRising
    } else {
        Event::EdgeFalling
    };
    push_event(event);
}

/// Install the GPIO ISR service and register the comparator handler.
/// Call after `init_peripherals()` and before the startup probe arms
/// the first direction, so no crossing can slip between probe and arm.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handler registered
    // below only touches atomics and the lock-free event queue.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let ret = gpio_isr_handler_add(
            pins::COMPARATOR_GPIO,
            Some(comparator_gpio_isr),
            core::ptr::null_mut(),
        );
        if ret != ESP_OK {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        info!("hw_init: ISR service installed (comparator)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

/// Reprogram the comparator interrupt for one transition direction and
/// record it in the ISR mirror.  Called from the evaluator's rearm
/// path via the trigger port.
#[cfg(target_os = "espidf")]
pub fn arm_comparator_edge(edge: ArmedEdge) {
    ARMED_EDGE.store(armed_edge_code(edge), Ordering::Release);
    let intr = match edge {
        ArmedEdge::Rising => gpio_int_type_t_GPIO_INTR_POSEDGE,
        ArmedEdge::Falling => gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    // SAFETY: pin configured as input in init_gpio(); these register
    // writes run from the main loop only.
    unsafe {
        gpio_set_intr_type(pins::COMPARATOR_GPIO, intr);
        gpio_intr_enable(pins::COMPARATOR_GPIO);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn arm_comparator_edge(edge: ArmedEdge) {
    ARMED_EDGE.store(armed_edge_code(edge), Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_mirror_tracks_direction() {
        arm_comparator_edge(ArmedEdge::Rising);
        assert_eq!(armed_edge(), ArmedEdge::Rising);
        arm_comparator_edge(ArmedEdge::Falling);
        assert_eq!(armed_edge(), ArmedEdge::Falling);
    }
}
