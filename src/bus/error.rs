//! Common error types for bus operations

use super::Event;
use crate::{Fault, Severity};

/// A common error type for bus transactions.
///
/// This enum defines the outcomes of a failed transaction. It is designed to
/// be simple and portable for `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The controller rejected the open request (resource busy, bad config).
    OpenFailed,
    /// The controller rejected the peripheral address binding.
    AddressRejected,
    /// The controller refused to start the transfer.
    TransferRejected,
    /// No completion event arrived within the poll budget.
    Timeout,
    /// A completion event arrived, but not the one the transfer expected.
    Aborted(Event),
    /// A transaction was attempted after teardown, before reinitialization.
    NotInitialized,
}

impl Fault for Error {
    fn severity(&self) -> Severity {
        match self {
            // Open/bind rejection points at configuration, not link state.
            Error::OpenFailed | Error::AddressRejected => Severity::Fatal,
            Error::TransferRejected | Error::Timeout | Error::Aborted(_) => Severity::Recoverable,
            Error::NotInitialized => Severity::Recoverable,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::OpenFailed => defmt::write!(f, "OpenFailed"),
            Error::AddressRejected => defmt::write!(f, "AddressRejected"),
            Error::TransferRejected => defmt::write!(f, "TransferRejected"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::Aborted(event) => defmt::write!(f, "Aborted({})", event),
            Error::NotInitialized => defmt::write!(f, "NotInitialized"),
        }
    }
}
