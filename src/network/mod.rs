//! A network abstraction layer for embedded systems
//!
//! This module defines the byte-stream traits an established transport must
//! implement, plus the layers built on top of them: secure session
//! establishment and the application-level HTTP client. The traits stay
//! synchronous and blocking; the core runs on a single logical thread of
//! control.

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Secure session provisioning and connection establishment
pub mod session;

/// Application-layer protocol clients
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connection, Read, Write};
    pub use super::session::{CredentialStore, SecureConnect};
}

// Core synchronous traits

pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// An established synchronous connection.
///
/// The session establisher produces one of these; every telemetry exchange
/// reuses it until a fatal error or process restart.
pub trait Connection: Read + Write + Close {}
