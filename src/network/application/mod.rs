//! # Application Layer Network Protocols
//!
//! Protocol clients that run on top of an established
//! [`Connection`](crate::network::Connection). One protocol is implemented:
//! HTTP/1.1, which the telemetry endpoint speaks.
//!
//! ## Design Principles
//!
//! - **Connection Agnostic**: Work with any type implementing
//!   [`Connection`](crate::network::Connection)
//! - **No-std Compatible**: Designed for embedded systems without heap
//!   allocation
//! - **Resource Conscious**: Buffers are bounded and scoped to one exchange
//! - **Error Handling**: One shared error type for transport and protocol
//!   failures

/// HTTP client implementation.
///
/// Provides a simple HTTP/1.1 client suitable for embedded systems,
/// supporting GET, POST and PUT methods with custom headers.
pub mod http;
