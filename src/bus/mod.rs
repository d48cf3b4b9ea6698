//! A two-wire bus abstraction for embedded systems
//!
//! This module provides the trait a platform implements to expose its bus
//! controller, the completion event delivered by the controller's interrupt
//! callback, and the blocking transaction driver built on top of both.
//!
//! The controller's `write` and `read` only *start* a transfer; completion is
//! reported asynchronously through an [`EventSlot`] the callback signals. The
//! [`transaction::Driver`] owns the polling side of that exchange.

#![allow(missing_docs)]
#![deny(unsafe_code)]

use core::sync::atomic::{AtomicU8, Ordering};

/// Common error types for bus operations
pub mod error;

/// Blocking request/acknowledge transactions over the bus
pub mod transaction;

/// Re-exports of common items
pub mod prelude {
    pub use super::{AddressMode, BusController, Event, EventSlot};
    pub use super::transaction::{Config, Driver};
}

/// Peripheral addressing width used when binding a slave address.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AddressMode {
    /// Standard 7-bit addressing.
    SevenBit,
    /// Extended 10-bit addressing.
    TenBit,
}

/// Completion event reported by the bus controller.
///
/// The controller's interrupt callback delivers exactly one of these per
/// started transfer. `None` means no event has been delivered yet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum Event {
    /// No completion has been signalled since the slot was last cleared.
    None = 0,
    /// A write transfer completed successfully.
    TransmitComplete = 1,
    /// A read transfer completed successfully.
    ReceiveComplete = 2,
    /// The controller aborted the transfer (arbitration loss, NACK, fault).
    Aborted = 3,
}

impl Event {
    fn from_code(code: u8) -> Self {
        match code {
            1 => Event::TransmitComplete,
            2 => Event::ReceiveComplete,
            3 => Event::Aborted,
            _ => Event::None,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Event {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Event::None => defmt::write!(f, "None"),
            Event::TransmitComplete => defmt::write!(f, "TransmitComplete"),
            Event::ReceiveComplete => defmt::write!(f, "ReceiveComplete"),
            Event::Aborted => defmt::write!(f, "Aborted"),
        }
    }
}

/// Single-slot completion signal shared between the controller's interrupt
/// callback and the transaction driver's poll loop.
///
/// The callback [`signal`](EventSlot::signal)s the most recent event; the
/// driver clears the slot before starting a transfer and polls it afterwards.
/// Only the most recent event is retained, which matches a bus that carries
/// one transfer at a time.
#[derive(Debug)]
pub struct EventSlot(AtomicU8);

impl EventSlot {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self(AtomicU8::new(Event::None as u8))
    }

    /// Record a completion event. Called from the controller callback.
    pub fn signal(&self, event: Event) {
        self.0.store(event as u8, Ordering::Release);
    }

    /// Read the most recent event without consuming it.
    pub fn current(&self) -> Event {
        Event::from_code(self.0.load(Ordering::Acquire))
    }

    /// Discard any pending event.
    pub fn clear(&self) {
        self.0.store(Event::None as u8, Ordering::Release);
    }
}

impl Default for EventSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform bus controller the transaction driver runs on.
///
/// `write` and `read` start a transfer and return immediately; the outcome
/// arrives later through the completion callback wired to an [`EventSlot`].
/// Implementations report controller-level rejection (resource busy, invalid
/// parameter) through their own error type, which the driver maps into its
/// outcome classification.
pub trait BusController {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open the controller and claim the bus.
    fn open(&mut self) -> Result<(), Self::Error>;
    /// Bind the fixed peripheral address for subsequent transfers.
    fn bind_address(&mut self, address: u8, mode: AddressMode) -> Result<(), Self::Error>;
    /// Start an asynchronous write of `bytes` to the bound peripheral.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
    /// Start an asynchronous read of `buf.len()` bytes from the bound peripheral.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
    /// Release the bus. Infallible teardown.
    fn close(&mut self);
}
