//! Request orchestration against the telemetry endpoint.
//!
//! Two exchanges are supported, both over the single established session:
//!
//! - **read-query**: fetch the latest datum and remember its identifier
//! - **write-update**: push the latest sensor reading as a JSON datum
//!
//! A read-query caches the identifier of the newest datum; a later
//! write-update addresses that datum directly (`PUT` to `<write_path><id>`).
//! Without a cached identifier a write-update creates a new datum (`POST` to
//! the base path).
//!
//! The orchestrator never retries: connection-level recovery belongs to the
//! session establisher, and the caller decides what a failed exchange means
//! using the error's [`Severity`].

/// Response-body identifier extraction strategies.
pub mod parser;

use crate::network::Connection;
use crate::network::application::http::client::{
    Client, Header, MAX_HEADERS, Method, Request, Response,
};
use crate::network::error::Error as NetworkError;
use crate::sensor::hs300x::Reading;
use crate::{Fault, Severity};
use core::fmt::Write;
use heapless::{String, Vec};
use serde::Serialize;

/// Capacity reserved for a cached datum identifier.
pub const IDENTIFIER_CAPACITY: usize = 32;

// Bounded scratch for one write-update.
const WRITE_PATH_CAPACITY: usize = 128;
const BODY_CAPACITY: usize = 64;

/// Endpoint coordinates and authentication for both exchange types.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Config<'a> {
    /// Host name, also sent as the `Host` header.
    pub host: &'a str,
    /// Path queried by a read-query, typically with a `limit=1` parameter.
    pub read_path: &'a str,
    /// Base path for write-updates; a cached identifier is appended.
    pub write_path: &'a str,
    /// Name of the authentication header the service expects.
    pub api_key_header: &'a str,
    /// Value of the authentication header.
    pub api_key: &'a str,
}

/// A common error type for telemetry exchanges.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The request could not be assembled within its bounds (path, headers
    /// or body).
    HeaderBuild,
    /// The exchange failed below the protocol: send, receive or parse.
    Send(NetworkError),
    /// The server answered with a non-success status.
    Server(u16),
}

impl Fault for Error {
    fn severity(&self) -> Severity {
        match self {
            Error::HeaderBuild => Severity::Fatal,
            // Re-establishing the session is the recovery for transport loss.
            Error::Send(_) => Severity::Recoverable,
            Error::Server(status) if *status >= 500 => Severity::Transient,
            Error::Server(_) => Severity::Fatal,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::HeaderBuild => defmt::write!(f, "HeaderBuild"),
            Error::Send(inner) => defmt::write!(f, "Send({})", inner),
            Error::Server(status) => defmt::write!(f, "Server({})", status),
        }
    }
}

#[derive(Serialize)]
struct Datum<'a> {
    value: &'a str,
}

#[derive(Serialize)]
struct UploadBody<'a> {
    datum: Datum<'a>,
}

/// Sequences read-query and write-update exchanges over one session.
///
/// Owns the session for the lifetime of the application run; one exchange at
/// a time, by construction.
pub struct Orchestrator<'a, C: Connection> {
    client: Client<C>,
    config: Config<'a>,
    identifier: Option<String<IDENTIFIER_CAPACITY>>,
}

impl<'a, C: Connection> Orchestrator<'a, C> {
    /// Wrap an established session.
    pub fn new(session: C, config: Config<'a>) -> Self {
        Self {
            client: Client::new(session),
            config,
            identifier: None,
        }
    }

    /// The datum identifier remembered from the last successful read-query.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Fetch the latest datum from the endpoint.
    ///
    /// On a successful response the datum identifier is copied out of the
    /// response body and cached for later write-updates. A body the parser
    /// cannot make sense of leaves the cache untouched; the exchange itself
    /// still succeeded.
    pub fn read_latest(&mut self) -> Result<Response, Error> {
        let request = Request {
            method: Method::Get,
            path: self.config.read_path,
            headers: self.base_headers()?,
            body: None,
        };
        let response = self.client.request(&request).map_err(Error::Send)?;
        if !response.is_success() {
            return Err(Error::Server(response.status_code));
        }

        if let Some(id) = parser::extract_identifier(&response.body) {
            if let Ok(owned) = String::try_from(id) {
                self.identifier = Some(owned);
            }
        }
        Ok(response)
    }

    /// Push a sensor reading to the endpoint as `{"datum":{"value":"X.XX"}}`.
    ///
    /// Updates the datum cached by the last read-query when one is known,
    /// creates a new datum otherwise.
    pub fn push_reading(&mut self, reading: &Reading) -> Result<Response, Error> {
        let mut value: String<16> = String::new();
        write!(value, "{:.2}", reading.temperature_celsius()).map_err(|_| Error::HeaderBuild)?;

        let mut body = [0u8; BODY_CAPACITY];
        let body_len = serde_json_core::to_slice(
            &UploadBody {
                datum: Datum { value: &value },
            },
            &mut body,
        )
        .map_err(|_| Error::HeaderBuild)?;

        let mut path: String<WRITE_PATH_CAPACITY> = String::new();
        path.push_str(self.config.write_path)
            .map_err(|_| Error::HeaderBuild)?;
        let method = match self.identifier.as_deref() {
            Some(id) => {
                path.push_str(id).map_err(|_| Error::HeaderBuild)?;
                Method::Put
            }
            None => Method::Post,
        };

        let request = Request {
            method,
            path: &path,
            headers: self.base_headers()?,
            body: Some(&body[..body_len]),
        };
        let response = self.client.request(&request).map_err(Error::Send)?;
        if !response.is_success() {
            return Err(Error::Server(response.status_code));
        }
        Ok(response)
    }

    fn base_headers(&self) -> Result<Vec<Header, MAX_HEADERS>, Error> {
        let mut headers = Vec::new();
        let pairs = [
            ("Host", self.config.host),
            ("Content-Type", "application/json"),
            (self.config.api_key_header, self.config.api_key),
            ("Connection", "keep-alive"),
        ];
        for (name, value) in pairs {
            headers
                .push(Header::new(name, value).map_err(|_| Error::HeaderBuild)?)
                .map_err(|_| Error::HeaderBuild)?;
        }
        Ok(headers)
    }
}
