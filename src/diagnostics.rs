//! Runtime diagnostics.
//!
//! A panic in an unattended controller must end in a reset, not a
//! wedged board holding whatever the valve pin happened to be — after
//! the reset the pin returns to its power-on low (closed) default and
//! the startup probe re-establishes ground truth.

/// Route panics through the logger, then reset (espidf) or fall back
/// to the default hook (host).
pub fn install_panic_handler() {
    #[cfg(target_os = "espidf")]
    {
        std::panic::set_hook(Box::new(|info| {
            log::error!("panic: {info} — restarting");
            // SAFETY: esp_restart never returns; nothing to clean up,
            // peripheral state is rebuilt from scratch on boot.
            unsafe { esp_idf_svc::sys::esp_restart() };
        }));
    }
}
