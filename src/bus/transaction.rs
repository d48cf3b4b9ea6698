//! Blocking request/acknowledge transactions over the two-wire bus.
//!
//! The driver issues one transfer at a time and busy-polls the shared
//! [`EventSlot`] for its completion. Polling is the synchronization primitive
//! here: the driver runs in a single-threaded blocking context with no
//! task-level wait primitive wired to the completion interrupt, and there is
//! exactly one consumer of the bus.
//!
//! On any non-success outcome the driver tears the bus binding down; the
//! caller must call [`Driver::initialize`] again before retrying.

use super::error::Error;
use super::{AddressMode, BusController, Event, EventSlot};
use crate::time::DelayMs;

/// Poll-loop settings for completion detection.
///
/// The defaults reproduce the reference timing: 1 ms granularity, 1000
/// iterations, roughly a one second ceiling per transfer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Config {
    /// Pause between completion-flag polls, in milliseconds.
    pub poll_interval_ms: u32,
    /// Maximum number of polls before the transfer is declared timed out.
    pub poll_budget: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1,
            poll_budget: 1000,
        }
    }
}

/// Blocking transaction driver bound to one peripheral address.
///
/// Owns the controller and the pacing delay; borrows the [`EventSlot`] the
/// platform's completion callback signals. The slot is cleared before every
/// transfer and read only by this driver's poll loop.
pub struct Driver<'a, C, D> {
    controller: C,
    delay: D,
    slot: &'a EventSlot,
    address: u8,
    config: Config,
    bound: bool,
}

impl<'a, C: BusController, D: DelayMs> Driver<'a, C, D> {
    /// Create a driver for the peripheral at `address`.
    ///
    /// The driver starts unbound; call [`initialize`](Self::initialize)
    /// before the first transaction.
    pub fn new(controller: C, delay: D, slot: &'a EventSlot, address: u8, config: Config) -> Self {
        Self {
            controller,
            delay,
            slot,
            address,
            config,
            bound: false,
        }
    }

    /// Open the bus and bind the peripheral address.
    ///
    /// Must be called before the first transaction and again after any failed
    /// transaction, which tears the binding down.
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.controller.open().map_err(|_| Error::OpenFailed)?;
        if self
            .controller
            .bind_address(self.address, AddressMode::SevenBit)
            .is_err()
        {
            self.controller.close();
            return Err(Error::AddressRejected);
        }
        self.bound = true;
        Ok(())
    }

    /// Whether the driver currently holds a usable bus binding.
    pub fn is_initialized(&self) -> bool {
        self.bound
    }

    /// Send `bytes` to the peripheral and wait for transmit completion.
    pub fn write_command(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if !self.bound {
            return Err(Error::NotInitialized);
        }
        self.slot.clear();
        if self.controller.write(bytes).is_err() {
            self.teardown();
            return Err(Error::TransferRejected);
        }
        self.await_completion(Event::TransmitComplete)
    }

    /// Fill `buf` from the peripheral and wait for receive completion.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        if !self.bound {
            return Err(Error::NotInitialized);
        }
        self.slot.clear();
        if self.controller.read(buf).is_err() {
            self.teardown();
            return Err(Error::TransferRejected);
        }
        self.await_completion(Event::ReceiveComplete)
    }

    pub(crate) fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn await_completion(&mut self, expected: Event) -> Result<(), Error> {
        let mut remaining = self.config.poll_budget;
        loop {
            match self.slot.current() {
                Event::None => {
                    if remaining == 0 {
                        self.teardown();
                        return Err(Error::Timeout);
                    }
                    self.delay.delay_ms(self.config.poll_interval_ms);
                    remaining -= 1;
                }
                event if event == expected => {
                    self.slot.clear();
                    return Ok(());
                }
                event => {
                    // Wrong event and timeout are distinct outcomes but share
                    // the same teardown.
                    self.slot.clear();
                    self.teardown();
                    return Err(Error::Aborted(event));
                }
            }
        }
    }

    fn teardown(&mut self) {
        self.controller.close();
        self.bound = false;
    }
}
