//! Unix socket client for unixrpc
//!
//! The client connects once and runs sequential request/response rounds over
//! that connection, each bounded by a response timeout.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use unixrpc_client::UnixRpcClient;
//! use unixrpc_core::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = UnixRpcClient::connect("/tmp/socket_file").await?;
//!
//!     let response = client.request("floor", vec![Value::from(3.7)]).await?;
//!     println!("{:?}", response.results);
//!     Ok(())
//! }
//! ```
//!
//! Requests can also be read from JSON files with [`request_file::load`].

mod client;
mod client_builder;
pub mod request_file;

pub use client::UnixRpcClient;
pub use client_builder::{ClientBuilder, DEFAULT_TIMEOUT};
