//! # sensorlink - Sensor-to-Cloud Relay SDK
//!
//! A Rust library that lets an evaluation board read a humidity/temperature
//! sensor over a two-wire bus and relay the readings to a cloud telemetry
//! service over a secure connection. This library is designed for embedded
//! systems and supports `no_std` environments.
//!
//! ## Layers
//!
//! ### Bus
//! - **Transaction Driver**: single request/acknowledge exchanges with a
//!   fixed-address peripheral, with bounded-wait completion detection and
//!   error classification
//!
//! ### Sensor
//! - **HS300x Sequencer**: start-conversion command, stabilization delay, raw
//!   sample retrieval and fixed-point decoding into engineering units
//!
//! ### Network
//! - **Session Establisher**: credential provisioning and bounded-retry secure
//!   handshake against a remote host
//! - **HTTP Client**: request/response exchanges over any established
//!   connection
//!
//! ### Telemetry
//! - **Request Orchestrator**: read-query and write-update exchanges with the
//!   telemetry endpoint, including datum-identifier extraction and reuse
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sensorlink = "0.1.0"
//! ```
//!
//! ### Decoding a raw sample
//!
//! ```rust
//! use sensorlink::sensor::hs300x::{RawSample, convert};
//!
//! let raw = RawSample {
//!     humidity: [0x12, 0x34],
//!     temperature: [0x56, 0x78],
//! };
//!
//! let reading = convert(&raw);
//! assert_eq!(reading.temperature.integer_part, 15);
//! assert_eq!(reading.temperature.decimal_part, 73);
//! ```
//!
//! ### Pushing a reading to the telemetry endpoint
//!
//! ```rust,no_run
//! use sensorlink::telemetry::{Config, Orchestrator};
//! # use sensorlink::network::Connection;
//! # struct MockSession;
//! # impl Connection for MockSession {}
//! # impl sensorlink::network::Read for MockSession {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl sensorlink::network::Write for MockSession {
//! #     type Error = ();
//! #     fn write(&mut self, _buf: &[u8]) -> Result<usize, Self::Error> { Ok(0) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl sensorlink::network::Close for MockSession {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! // Session produced by the session establisher.
//! let session = MockSession;
//!
//! let config = Config {
//!     host: "io.example.com",
//!     read_path: "/api/v2/device/feeds/temperature/data?limit=1",
//!     write_path: "/api/v2/device/feeds/temperature/data/",
//!     api_key_header: "X-AIO-Key",
//!     api_key: "changeme",
//! };
//!
//! let mut orchestrator = Orchestrator::new(session, config);
//! // let response = orchestrator.read_latest()?;
//! // let response = orchestrator.push_reading(&reading)?;
//! ```
//!
//! ## Platform Support
//!
//! The library never touches hardware or sockets directly: the bus controller,
//! delay source, credential store and secure transport are traits the target
//! platform implements. Anything that can provide those works, from ARM
//! Cortex-M parts to a Linux host process.
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Two-wire bus abstraction and the blocking transaction driver.
///
/// Contains the bus controller trait the platform implements, the completion
/// event slot shared with the controller's interrupt callback, and the
/// transaction driver that serializes exchanges with the peripheral.
pub mod bus;

/// Humidity/temperature sensor acquisition and decoding.
///
/// Drives the HS300x measurement sequence over the bus transaction driver and
/// converts raw sample codes into engineering units.
pub mod sensor;

/// Network abstraction layer: connection traits, secure session establishment
/// and the embedded HTTP client.
pub mod network;

/// Telemetry exchanges with the remote endpoint.
///
/// Builds read-query and write-update requests from the latest sensor reading
/// and processes the responses.
pub mod telemetry;

/// Time services used by the blocking drivers.
pub mod time;

/// How far an error reaches: whether retrying, resetting a component, or
/// halting is the appropriate reaction.
///
/// The calling layer decides what to do with a failed operation; the error
/// itself only reports how recoverable it is. A demonstration loop may halt on
/// anything, a production supervisor would reinitialize the affected component
/// for [`Severity::Recoverable`] faults and only give up on [`Severity::Fatal`]
/// ones.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Severity {
    /// Retrying the same operation may succeed without intervention.
    Transient,
    /// The owning component must be reinitialized (bus) or re-established
    /// (session) before further use.
    Recoverable,
    /// No recovery strategy short of restarting the application.
    Fatal,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Severity {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Severity::Transient => defmt::write!(f, "Transient"),
            Severity::Recoverable => defmt::write!(f, "Recoverable"),
            Severity::Fatal => defmt::write!(f, "Fatal"),
        }
    }
}

/// Implemented by every error type in the crate to report its [`Severity`].
pub trait Fault {
    /// Classify this error for the caller's recovery policy.
    fn severity(&self) -> Severity;
}
