//! # Error Types
//!
//! Every failure in the exchange names the step that failed, so a binary can log
//! it and exit with status 1 without further inspection. Causes are exposed as
//! `source()`, not repeated in the message; print with `{:#}` through anyhow to
//! see the whole chain.

use std::io;
use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

/// Errors produced while setting up or running an exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The configured host is not an IP address.
    #[error("invalid listen address {host:?}")]
    Address {
        host: String,
        #[source]
        source: AddrParseError,
    },

    /// The listening socket could not be created.
    #[error("failed to create the server socket")]
    SocketCreate(#[source] io::Error),

    /// The socket could not be bound to the requested address (e.g. port in use).
    #[error("failed to bind the socket to {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The bound socket could not be switched to listening mode.
    #[error("failed to listen on {addr}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Accepting the incoming connection failed.
    #[error("failed to accept the connection")]
    Accept(#[source] io::Error),

    /// The client could not reach the server.
    #[error("failed to connect to {addr}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// An outgoing text message does not fit in the receive buffer.
    #[error("message is {len} bytes, the limit is {max} bytes including the newline")]
    TextTooLong { len: usize, max: usize },

    /// A fixed text reply contains a newline, which would end the line early.
    #[error("the text reply must be a single line")]
    MultilineReply,

    /// The peer closed the stream in the middle of a value.
    #[error("connection closed after {received} of 4 bytes of a value")]
    UnexpectedEof { received: usize },

    /// The peer closed the connection where an answer was expected.
    #[error("the peer closed the connection without answering")]
    Closed,

    /// Any other I/O failure while exchanging data.
    #[error("I/O error during the exchange")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
