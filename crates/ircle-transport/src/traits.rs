//! Transport abstraction traits for ircle.
//!
//! The session only needs an ordered, reliable byte stream. Anything
//! implementing tokio's `AsyncRead + AsyncWrite` qualifies; a [`Connector`]
//! knows how to open one for a host and port.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

/// A bidirectional byte stream.
pub trait ByteStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> ByteStream for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

/// A boxed byte stream, as returned by connectors.
pub type BoxedStream = Box<dyn ByteStream>;

/// A remote host and port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Create a new endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer closed the connection.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Opening the connection failed.
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    /// Opening the connection took too long.
    #[error("Connection timed out")]
    Timeout,

    /// Failed to send data.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Failed to receive data.
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    /// A line grew past the configured limit without a terminator.
    #[error("Line of {0} bytes exceeds the maximum length")]
    LineTooLong(usize),
}

/// Opens byte streams to remote endpoints.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a stream to `endpoint`.
    async fn connect(&self, endpoint: &Endpoint) -> Result<BoxedStream, TransportError>;

    /// Get the connector name (e.g., "tcp").
    fn name(&self) -> &'static str;
}
