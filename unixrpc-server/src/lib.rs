//! Method dispatch and Unix socket server for unixrpc
//!
//! This crate binds a Unix domain socket, accepts connections, and serves the
//! request/response protocol defined in `unixrpc-core` on each of them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use unixrpc_server::UnixRpcServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = UnixRpcServer::builder()
//!         .bind("/tmp/socket_file")
//!         .build()
//!         .await?;
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Accept loop**: one loop accepts connections and never waits on a
//!   session
//! - **Session tasks**: every connection gets its own Tokio task that owns it
//!   exclusively and runs the read, dispatch, write cycle
//! - **Router**: immutable after build and shared by all sessions, so
//!   handlers run without locks
//!
//! A failing session never affects the listener or other sessions. There is
//! no cap on the number of open sessions.

mod builder;
mod connection;
mod handler;
pub mod methods;
mod metrics;
mod router;

pub use builder::ServerBuilder;
pub use connection::handle_connection;
pub use handler::{from_fn, FnHandler, Handler};
pub use metrics::ServerMetrics;
pub use router::{Router, RouterBuilder};

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::{unix::SocketAddr, UnixListener, UnixStream};
use unixrpc_core::Result;

/// Unix socket server
///
/// # Lifecycle
///
/// 1. **Build**: `UnixRpcServer::builder()...build().await` removes a stale
///    socket file and binds
/// 2. **Run**: `run()` serves forever, `run_until(signal)` serves until the
///    signal future completes
/// 3. **Close**: `close()` drops the listener and deletes the socket file
pub struct UnixRpcServer {
    listener: UnixListener,
    path: PathBuf,
    router: Router,
    max_message_size: usize,
    metrics: Option<Arc<ServerMetrics>>,
    conn_counter: AtomicU64,
    active_connections: Arc<AtomicI64>,
}

impl UnixRpcServer {
    /// Create a new server builder
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Path of the bound socket
    pub fn local_path(&self) -> &Path {
        &self.path
    }

    /// The router sessions dispatch through
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Accept connections until the process exits
    ///
    /// Accept errors are logged and the loop keeps going.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Accept connections until `shutdown` completes
    ///
    /// Sessions already running are not interrupted; they end when their
    /// peers disconnect.
    #[tracing::instrument(skip(self, shutdown), name = "server.run", fields(path = %self.path.display()))]
    pub async fn run_until<F: Future>(&self, shutdown: F) -> Result<()> {
        tracing::info!("Server started");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => self.spawn_session(accepted),
            }
        }
    }

    /// Stop listening and remove the socket file
    pub fn close(self) -> Result<()> {
        let path = self.path.clone();
        drop(self);
        builder::remove_stale_socket(&path)
    }

    fn spawn_session(&self, accepted: std::io::Result<(UnixStream, SocketAddr)>) {
        let stream = match accepted {
            Ok((stream, _addr)) => stream,
            Err(e) => {
                tracing::error!(error = %e, "Error accepting connection");
                return;
            }
        };

        let conn_id = self.conn_counter.fetch_add(1, Ordering::SeqCst);
        let router = self.router.clone();
        let max_message_size = self.max_message_size;
        let metrics = self.metrics.clone();
        let active = Arc::clone(&self.active_connections);

        let now_active = active.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(conn_id = conn_id, active = now_active, "New connection accepted");
        if let Some(ref m) = metrics {
            m.record_connection(now_active);
        }

        tokio::spawn(async move {
            let result = connection::handle_connection(
                stream,
                conn_id,
                router,
                max_message_size,
                metrics.clone(),
            )
            .await;

            if let Err(ref e) = result {
                tracing::error!(conn_id = conn_id, error = %e, "Connection error");
            }

            let remaining = active.fetch_sub(1, Ordering::SeqCst) - 1;
            if let Some(ref m) = metrics {
                if let Err(ref e) = result {
                    m.record_error(e.kind());
                }
                m.record_disconnection(remaining);
            }
        });
    }
}
