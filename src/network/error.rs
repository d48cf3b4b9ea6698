//! Common error types for network operations

use crate::{Fault, Severity};

/// A common error type for network operations.
///
/// This enum defines a set of common errors that can occur when exchanging
/// bytes over an established connection. It is designed to be simple and
/// portable for `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An operation was attempted on a connection that is not open.
    NotOpen,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// A timeout occurred.
    Timeout,
    /// The connection was closed by the peer.
    ConnectionClosed,
    /// A request or response exceeded its bounded buffer.
    BufferOverflow,
    /// The peer sent something that does not parse as the protocol.
    ProtocolError,
}

impl Fault for Error {
    fn severity(&self) -> Severity {
        match self {
            Error::Timeout | Error::ProtocolError => Severity::Transient,
            Error::NotOpen | Error::WriteError | Error::ReadError | Error::ConnectionClosed => {
                Severity::Recoverable
            }
            Error::BufferOverflow => Severity::Fatal,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
        }
    }
}
