//! Error types for unixrpc
//!
//! Every fallible operation in the workspace returns [`Result`], built on the
//! single [`Error`] enum below. The variants fall into two groups that the
//! rest of the system treats very differently:
//!
//! - **Connection-level**: `Transport`, `Io`, `Codec`, `Timeout`,
//!   `ConnectionClosed`. On the server these end the affected session (or
//!   refuse to start the process when they happen at bind time). On the client
//!   they abort the current round.
//! - **Call-level**: `UnknownMethod`, `Validation`. These never close a
//!   connection; the session reports them inside a well-formed
//!   [`Response`](crate::Response) that still carries the request `id`.
//!
//! # Examples
//!
//! ```rust
//! use unixrpc_core::Error;
//!
//! let err = Error::UnknownMethod("frobnicate".into());
//! assert_eq!(err.to_string(), "unknown method: frobnicate");
//! assert!(err.is_call_error());
//! ```

use thiserror::Error;

/// Result type for unixrpc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Application-level error type for unixrpc operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Socket-layer failure: bind, listen, accept, connect, read or write.
    #[error("transport error: {0}")]
    Transport(String),

    /// Filesystem failure outside the socket, such as reading a request file.
    #[error("IO error: {0}")]
    Io(String),

    /// Bytes that are not a well-formed encoding of the expected message.
    #[error("codec error: {0}")]
    Codec(String),

    /// No handler is registered under the requested method name.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Wrong argument count, wrong argument kind, or an out-of-domain value.
    #[error("{0}")]
    Validation(String),

    /// No response arrived before the client deadline.
    ///
    /// The connection is left open and can be used for the next round.
    #[error("timeout while waiting for response")]
    Timeout,

    /// The peer closed the connection.
    #[error("connection closed")]
    ConnectionClosed,

    /// Invalid server or client configuration, detected before any I/O.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a validation error from any displayable cause.
    pub fn validation(cause: impl Into<String>) -> Self {
        Error::Validation(cause.into())
    }

    /// Short label for the variant, used as a metric attribute and log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Transport(_) => "transport",
            Error::Io(_) => "io",
            Error::Codec(_) => "codec",
            Error::UnknownMethod(_) => "unknown_method",
            Error::Validation(_) => "validation",
            Error::Timeout => "timeout",
            Error::ConnectionClosed => "connection_closed",
            Error::Config(_) => "config",
        }
    }

    /// Returns true for errors that belong inside a response rather than
    /// terminating the connection.
    pub fn is_call_error(&self) -> bool {
        matches!(self, Error::UnknownMethod(_) | Error::Validation(_))
    }

    /// Returns true when the client connection is still usable after this
    /// error and the next round may proceed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Timeout
                | Error::Codec(_)
                | Error::Io(_)
                | Error::UnknownMethod(_)
                | Error::Validation(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Codec(err.to_string())
    }
}
