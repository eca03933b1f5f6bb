//! Core message types, value model and codec for unixrpc
//!
//! This crate provides the pieces shared by the server and the client:
//!
//! - **Types**: [`Request`], [`Response`], the dynamic [`Value`] model and the
//!   [`ResultType`] tag
//! - **Codec**: JSON encoding and decoding of both message types
//! - **Error handling**: the [`Error`] taxonomy used across the workspace
//! - **Observability**: `tracing` subscriber and OpenTelemetry setup
//!
//! # Wire Format
//!
//! Each message is one JSON object sent as raw bytes, with no length prefix
//! and no delimiter:
//!
//! ```text
//! request:  {"method": "floor", "params": [3.7], "param_types": ["float"], "id": 1}
//! response: {"results": 3, "result_type": "int", "id": 1}
//! error:    {"results": null, "result_type": "", "id": 1, "error": "..."}
//! ```
//!
//! # Example
//!
//! ```rust
//! use unixrpc_core::{codec, Request, Value};
//!
//! let request = Request::new("reverse", vec![Value::from("héllo")], 1);
//! let bytes = codec::encode_request(&request).unwrap();
//! let decoded = codec::decode_request(&bytes).unwrap();
//! assert_eq!(decoded.method, "reverse");
//! ```

pub mod codec;
pub mod error;
pub mod observability;
pub mod types;

pub use error::{Error, Result};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use types::{Dispatched, Request, Response, ResultType, Value};

/// Read buffer size used by both ends unless configured otherwise.
///
/// One read of at most this many bytes is treated as one whole message.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024;
