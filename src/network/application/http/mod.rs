//! HTTP/1.1 protocol implementation for embedded systems.
//!
//! A lightweight synchronous client for `no_std` environments: fixed-size
//! buffers, custom headers, GET/POST/PUT, and connection reuse over a single
//! established transport. Request and response buffers are created inside one
//! [`client::Client::request`] call and dropped when it returns, so only one
//! exchange can be in flight per client.

/// HTTP client implementation and supporting types.
pub mod client;
