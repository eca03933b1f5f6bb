//! Server builder
//!
//! The builder gathers everything the listener needs before it binds: the
//! socket path, the method router, the read buffer size and optional
//! observability. It starts out with the built-in methods registered.
//!
//! # Examples
//!
//! ```rust,no_run
//! use unixrpc_core::{Dispatched, ResultType};
//! use unixrpc_server::{from_fn, UnixRpcServer};
//!
//! # async fn example() -> unixrpc_core::Result<()> {
//! let server = UnixRpcServer::builder()
//!     .bind("/tmp/socket_file")
//!     .handler("ping", from_fn(|_| Ok(Dispatched::new("pong", ResultType::String))))
//!     .max_message_size(4096)
//!     .build()
//!     .await?;
//!
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

use crate::{Handler, Router, ServerMetrics, UnixRpcServer};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, AtomicU64};
use std::sync::Arc;
use tokio::net::UnixListener;
use unixrpc_core::{Error, ObservabilityConfig, Result, DEFAULT_MAX_MESSAGE_SIZE};

/// Builder for constructing a [`UnixRpcServer`]
pub struct ServerBuilder {
    path: Option<PathBuf>,
    router: Router,
    max_message_size: usize,
    observability_config: Option<ObservabilityConfig>,
    enable_metrics: bool,
}

impl ServerBuilder {
    /// Create a builder with the built-in methods registered
    pub fn new() -> Self {
        Self {
            path: None,
            router: Router::with_builtins(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            observability_config: None,
            enable_metrics: false,
        }
    }

    /// Set the socket path to listen on
    pub fn bind(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Register a handler, replacing any built-in of the same name
    pub fn handler(mut self, method: impl Into<String>, handler: Box<dyn Handler>) -> Self {
        self.router.register(method, handler);
        self
    }

    /// Replace the router, including the built-in methods
    pub fn router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Set the per-read buffer size, which is also the largest message a
    /// session can receive (default 1024)
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Initialize logging and OpenTelemetry during `build()`
    pub fn with_observability(mut self, config: ObservabilityConfig) -> Self {
        self.observability_config = Some(config);
        self
    }

    /// Record [`ServerMetrics`] on the global meter
    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Remove any stale socket file, bind, and return the server
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no path was given or the buffer size is zero
    /// - [`Error::Transport`] if the stale file cannot be removed or the bind
    ///   fails; the process should not start
    pub async fn build(self) -> Result<UnixRpcServer> {
        let path = self
            .path
            .ok_or_else(|| Error::Config("no socket path specified".to_string()))?;
        if self.max_message_size == 0 {
            return Err(Error::Config(
                "max_message_size must be greater than zero".to_string(),
            ));
        }

        let mut enable_metrics = self.enable_metrics;
        let mut service_name = "unixrpc".to_string();
        if let Some(config) = self.observability_config {
            enable_metrics |= config.enable_metrics;
            service_name = config.service_name.clone();
            unixrpc_core::init_observability(config).map_err(|e| {
                Error::Config(format!("failed to initialize observability: {}", e))
            })?;
        }

        remove_stale_socket(&path)?;
        let listener = UnixListener::bind(&path).map_err(|e| {
            Error::Transport(format!("failed to bind {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Server listening");

        let metrics = enable_metrics.then(|| Arc::new(ServerMetrics::new(service_name)));

        Ok(UnixRpcServer {
            listener,
            path,
            router: self.router,
            max_message_size: self.max_message_size,
            metrics,
            conn_counter: AtomicU64::new(0),
            active_connections: Arc::new(AtomicI64::new(0)),
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Delete a leftover socket file from a previous run
pub(crate) fn remove_stale_socket(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Removed stale socket file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Transport(format!(
            "failed to remove stale socket file {}: {}",
            path.display(),
            e
        ))),
    }
}
