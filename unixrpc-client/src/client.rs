//! Round-trip client
//!
//! [`UnixRpcClient`] holds one connection and performs strictly sequential
//! round trips on it: write one encoded request, then wait for one read that
//! holds the encoded response. The wait is bounded by the configured timeout.
//!
//! A timed-out round leaves the connection open. If the server answers late,
//! that answer is what the next round reads.

use crate::ClientBuilder;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use unixrpc_core::{codec, Error, Request, Response, Result, Value};

/// Client connected to a unixrpc server
pub struct UnixRpcClient {
    stream: UnixStream,
    timeout: Duration,
    max_message_size: usize,
    next_id: i64,
}

impl UnixRpcClient {
    /// Connect with the default timeout and buffer size
    ///
    /// Use [`ClientBuilder`] to change either.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        ClientBuilder::new(path).connect().await
    }

    pub(crate) fn from_parts(stream: UnixStream, timeout: Duration, max_message_size: usize) -> Self {
        Self {
            stream,
            timeout,
            max_message_size,
            next_id: 1,
        }
    }

    /// Response deadline for each round
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one request and wait for its response
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the write or read fails
    /// - [`Error::Timeout`] if nothing arrives before the deadline
    /// - [`Error::ConnectionClosed`] if the server closed the connection
    /// - [`Error::Codec`] if the reply is not a valid response
    #[tracing::instrument(skip(self, request), fields(method = %request.method, id = request.id))]
    pub async fn call(&mut self, request: &Request) -> Result<Response> {
        let bytes = codec::encode_request(request)?;
        self.stream
            .write_all(&bytes)
            .await
            .map_err(|e| Error::Transport(format!("failed to send request: {}", e)))?;
        tracing::debug!(bytes = bytes.len(), "Request sent");

        let mut buffer = vec![0u8; self.max_message_size];
        let n = match tokio::time::timeout(self.timeout, self.stream.read(&mut buffer)).await {
            Ok(Ok(0)) => return Err(Error::ConnectionClosed),
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                return Err(Error::Transport(format!("failed to read response: {}", e)))
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Timed out waiting for response");
                return Err(Error::Timeout);
            }
        };

        let response = codec::decode_response(&buffer[..n])?;
        if response.id != request.id {
            tracing::warn!(expected = request.id, received = response.id, "Response id mismatch");
        }
        Ok(response)
    }

    /// Call `method` with `params`, assigning the next request id
    pub async fn request(
        &mut self,
        method: impl Into<String>,
        params: Vec<Value>,
    ) -> Result<Response> {
        let id = self.next_id;
        self.next_id += 1;
        self.call(&Request::new(method, params, id)).await
    }
}
