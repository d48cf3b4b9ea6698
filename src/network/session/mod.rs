//! Secure session provisioning and connection establishment.
//!
//! Establishing a session is a short linear state machine:
//!
//! `Idle → Provisioning → Provisioned → Connecting → Connected`
//!
//! with `Failed` as the terminal state if any step gives out. Provisioning
//! writes the device identity into the platform's credential store under
//! well-known labels; connecting performs the secure handshake with a fixed
//! retry budget and a fixed linear back-off between attempts. An embedded
//! network stack recovering from a transient link issue benefits from a short
//! fixed pause; with a budget this small there is nothing to gain from
//! exponential growth or jitter.
//!
//! Once [`State::Failed`] is reached the establisher is done; recovering means
//! building a fresh one (reconnection is the application's decision, guided by
//! [`Severity`](crate::Severity)).

use crate::network::Connection;
use crate::time::DelayMs;
use crate::{Fault, Severity};

/// Credential-store label for the device certificate.
pub const CLIENT_CERTIFICATE_LABEL: &str = "device-certificate-tls";

/// Credential-store label for the device private key.
pub const PRIVATE_KEY_LABEL: &str = "device-private-key-tls";

/// Connection attempts before establishment is declared failed.
pub const DEFAULT_RETRY_BUDGET: u32 = 5;

/// Pause between connection attempts, in milliseconds.
pub const DEFAULT_RETRY_BACKOFF_MS: u32 = 3000;

/// Send/receive timeout handed to the transport, in milliseconds.
pub const DEFAULT_SOCKET_TIMEOUT_MS: u32 = 10_000;

/// Device identity and trust anchor material, PEM encoded.
///
/// Conceptually externally supplied; demonstration firmware tends to bake it
/// into the image. Held only for the duration of connection setup.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    /// Client certificate presented during the handshake.
    pub client_certificate: &'a [u8],
    /// Private key matching the client certificate.
    pub private_key: &'a [u8],
    /// Trust anchor used to verify the remote endpoint.
    pub root_ca: &'a [u8],
}

/// Secure credential store the platform provides.
///
/// Typically a PKCS#11-style token or a flash-backed keystore. Labels are
/// stable well-known names the transport looks keys up by.
pub trait CredentialStore {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Persist `material` under `label`, replacing any previous value.
    fn store(&mut self, label: &str, material: &[u8]) -> Result<(), Self::Error>;
}

/// Secure transport connector the platform provides.
///
/// One call performs the whole handshake and, on success, yields the
/// established [`Connection`] used for every subsequent exchange.
pub trait SecureConnect {
    /// The established session type.
    type Session: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Attempt one handshake with the remote endpoint.
    fn connect(
        &mut self,
        host: &str,
        port: u16,
        credentials: &Credentials,
        send_timeout_ms: u32,
        recv_timeout_ms: u32,
    ) -> Result<Self::Session, Self::Error>;
}

/// Connection-establishment settings.
///
/// Every constant that shapes the retry behaviour lives here rather than in
/// the control flow.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Config<'a> {
    /// Remote endpoint host name.
    pub host: &'a str,
    /// Remote endpoint TCP port.
    pub port: u16,
    /// Maximum handshake attempts. At least one attempt is always made.
    pub retry_budget: u32,
    /// Fixed pause between attempts, in milliseconds.
    pub retry_backoff_ms: u32,
    /// Transport send timeout, in milliseconds.
    pub send_timeout_ms: u32,
    /// Transport receive timeout, in milliseconds.
    pub recv_timeout_ms: u32,
}

impl<'a> Config<'a> {
    /// Settings for `host:port` with the default retry and timeout values.
    pub fn new(host: &'a str, port: u16) -> Self {
        Self {
            host,
            port,
            retry_budget: DEFAULT_RETRY_BUDGET,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            send_timeout_ms: DEFAULT_SOCKET_TIMEOUT_MS,
            recv_timeout_ms: DEFAULT_SOCKET_TIMEOUT_MS,
        }
    }
}

/// Where the establisher is in its lifecycle.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// Nothing has happened yet.
    Idle,
    /// Credential material is being written to the store.
    Provisioning,
    /// Credentials are in place; ready to connect.
    Provisioned,
    /// Handshake attempts are in progress.
    Connecting,
    /// A session was produced. Terminal success.
    Connected,
    /// A step failed beyond recovery. Terminal failure.
    Failed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for State {
    fn format(&self, f: defmt::Formatter) {
        match self {
            State::Idle => defmt::write!(f, "Idle"),
            State::Provisioning => defmt::write!(f, "Provisioning"),
            State::Provisioned => defmt::write!(f, "Provisioned"),
            State::Connecting => defmt::write!(f, "Connecting"),
            State::Connected => defmt::write!(f, "Connected"),
            State::Failed => defmt::write!(f, "Failed"),
        }
    }
}

/// A common error type for session establishment.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The credential store rejected the material (capacity, permission).
    StoreRejected,
    /// Connect was called before provisioning completed.
    NotProvisioned,
    /// The single permitted handshake attempt failed.
    HandshakeFailed,
    /// Every attempt in the retry budget failed.
    RetriesExhausted,
}

impl Fault for Error {
    fn severity(&self) -> Severity {
        match self {
            Error::StoreRejected => Severity::Fatal,
            // A fresh establisher and another connect round is the recovery.
            Error::NotProvisioned | Error::HandshakeFailed | Error::RetriesExhausted => {
                Severity::Recoverable
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::StoreRejected => defmt::write!(f, "StoreRejected"),
            Error::NotProvisioned => defmt::write!(f, "NotProvisioned"),
            Error::HandshakeFailed => defmt::write!(f, "HandshakeFailed"),
            Error::RetriesExhausted => defmt::write!(f, "RetriesExhausted"),
        }
    }
}

/// Drives provisioning and the bounded-retry handshake.
pub struct Establisher<S, T, D> {
    store: S,
    connector: T,
    delay: D,
    state: State,
}

impl<S: CredentialStore, T: SecureConnect, D: DelayMs> Establisher<S, T, D> {
    /// Create an idle establisher over the platform's store and connector.
    pub fn new(store: S, connector: T, delay: D) -> Self {
        Self {
            store,
            connector,
            delay,
            state: State::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Write the client certificate and private key into the credential
    /// store under the well-known labels.
    pub fn provision(&mut self, credentials: &Credentials) -> Result<(), Error> {
        self.state = State::Provisioning;
        let stored = self
            .store
            .store(CLIENT_CERTIFICATE_LABEL, credentials.client_certificate)
            .and_then(|()| self.store.store(PRIVATE_KEY_LABEL, credentials.private_key));
        match stored {
            Ok(()) => {
                self.state = State::Provisioned;
                Ok(())
            }
            Err(_) => {
                self.state = State::Failed;
                Err(Error::StoreRejected)
            }
        }
    }

    /// Perform the handshake, retrying up to the configured budget with the
    /// configured back-off between attempts.
    ///
    /// `N` attempts imply `N - 1` pauses; the budget spent without a session
    /// is terminal.
    pub fn connect(
        &mut self,
        config: &Config,
        credentials: &Credentials,
    ) -> Result<T::Session, Error> {
        if self.state != State::Provisioned {
            return Err(Error::NotProvisioned);
        }
        self.state = State::Connecting;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.connector.connect(
                config.host,
                config.port,
                credentials,
                config.send_timeout_ms,
                config.recv_timeout_ms,
            ) {
                Ok(session) => {
                    self.state = State::Connected;
                    return Ok(session);
                }
                Err(_) if attempt < config.retry_budget => {
                    self.delay.delay_ms(config.retry_backoff_ms);
                }
                Err(_) => {
                    self.state = State::Failed;
                    return Err(if config.retry_budget <= 1 {
                        Error::HandshakeFailed
                    } else {
                        Error::RetriesExhausted
                    });
                }
            }
        }
    }

    /// Provision and connect in sequence.
    pub fn establish(
        &mut self,
        config: &Config,
        credentials: &Credentials,
    ) -> Result<T::Session, Error> {
        self.provision(credentials)?;
        self.connect(config, credentials)
    }
}
