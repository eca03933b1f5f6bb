//! Client builder
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use unixrpc_client::ClientBuilder;
//!
//! # async fn example() -> unixrpc_core::Result<()> {
//! let client = ClientBuilder::new("/tmp/socket_file")
//!     .timeout(Duration::from_secs(2))
//!     .max_message_size(4096)
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::UnixRpcClient;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::UnixStream;
use unixrpc_core::{Error, Result, DEFAULT_MAX_MESSAGE_SIZE};

/// Response deadline used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for configuring and connecting a [`UnixRpcClient`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    path: PathBuf,
    timeout: Duration,
    max_message_size: usize,
}

impl ClientBuilder {
    /// Create a builder for the socket at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            timeout: DEFAULT_TIMEOUT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Set how long each round waits for a response (default 5 seconds)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the response read buffer size (default 1024)
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Connect to the server
    pub async fn connect(self) -> Result<UnixRpcClient> {
        if self.max_message_size == 0 {
            return Err(Error::Config(
                "max_message_size must be greater than zero".to_string(),
            ));
        }

        let stream = UnixStream::connect(&self.path).await.map_err(|e| {
            Error::Transport(format!("failed to connect to {}: {}", self.path.display(), e))
        })?;
        tracing::info!(path = %self.path.display(), "Connected to server");

        Ok(UnixRpcClient::from_parts(
            stream,
            self.timeout,
            self.max_message_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::new("/tmp/socket_file");
        assert_eq!(builder.path, PathBuf::from("/tmp/socket_file"));
        assert_eq!(builder.timeout, Duration::from_secs(5));
        assert_eq!(builder.max_message_size, 1024);
    }

    #[test]
    fn test_builder_chaining() {
        let builder = ClientBuilder::new("/run/rpc.sock")
            .timeout(Duration::from_millis(250))
            .max_message_size(64);
        assert_eq!(builder.timeout, Duration::from_millis(250));
        assert_eq!(builder.max_message_size, 64);
    }

    #[tokio::test]
    async fn test_zero_buffer_rejected() {
        let result = ClientBuilder::new("/tmp/unused.sock")
            .max_message_size(0)
            .connect()
            .await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_connect_sets_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rpc.sock");
        let _listener = tokio::net::UnixListener::bind(&path).unwrap();

        let client = ClientBuilder::new(&path)
            .timeout(Duration::from_secs(1))
            .connect()
            .await
            .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(1));
    }
}
