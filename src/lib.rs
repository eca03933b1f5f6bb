//! unixrpc - request/response RPC over a Unix domain socket
//!
//! Convenience crate that re-exports the unixrpc sub-crates and hosts the
//! interactive client loop used by the `unixrpc` binary.
//!
//! # Architecture
//!
//! - **unixrpc-core**: message types, JSON codec, errors, observability
//! - **unixrpc-server**: listener, per-connection sessions, method dispatch
//! - **unixrpc-client**: round-trip client with a response timeout
//!
//! # Quick Start - Server
//!
//! ```rust,no_run
//! use unixrpc::UnixRpcServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = UnixRpcServer::builder()
//!         .bind("/tmp/socket_file")
//!         .build()
//!         .await?;
//!
//!     server.run_until(tokio::signal::ctrl_c()).await?;
//!     server.close()?;
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Client
//!
//! ```rust,no_run
//! use unixrpc::core::Value;
//! use unixrpc::UnixRpcClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = UnixRpcClient::connect("/tmp/socket_file").await?;
//!     let response = client
//!         .request("validAnagram", vec![Value::from("listen"), Value::from("silent")])
//!         .await?;
//!     println!("{:?}", response.results);
//!     Ok(())
//! }
//! ```

pub mod repl;

pub use unixrpc_client as client;
pub use unixrpc_core as core;
pub use unixrpc_server as server;

pub use unixrpc_client::{ClientBuilder, UnixRpcClient};
pub use unixrpc_core::{Error, Request, Response, Result, ResultType, Value};
pub use unixrpc_server::{ServerBuilder, UnixRpcServer};
