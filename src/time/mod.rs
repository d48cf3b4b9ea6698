//! Time services for blocking drivers.
//!
//! The bus transaction driver, the sensor sequencer and the session
//! establisher all pace themselves with millisecond delays. The delay source
//! is a trait so targets can plug in a hardware timer, an RTOS sleep, or a
//! test double that only counts.

#![deny(unsafe_code)]

/// A blocking millisecond delay source.
pub trait DelayMs {
    /// Block the calling thread of control for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Delay source backed by [`std::thread::sleep`].
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl DelayMs for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
