//! Common test utilities for unixrpc-client integration tests
//!
//! Provides a mock Unix socket server so client behavior can be tested
//! without a real unixrpc-server.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;
use tokio::sync::mpsc;
use unixrpc_core::{codec, Dispatched, Request, Response};

/// Mock server bound to a socket inside its own temporary directory
///
/// Every read is decoded as one request and forwarded to the test through
/// `requests`; the handler decides what bytes, if any, to write back.
pub struct MockUnixServer {
    _dir: TempDir,
    path: PathBuf,
    requests: mpsc::UnboundedReceiver<Request>,
}

impl MockUnixServer {
    /// Start a mock server that answers every request with `handler`
    pub async fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> Option<Vec<u8>> + Send + Sync + 'static,
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = std::sync::Arc::new(handler);

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let tx = tx.clone();
                let handler = handler.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 1024];
                    loop {
                        let n = match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => n,
                        };
                        let Ok(request) = codec::decode_request(&buf[..n]) else {
                            return;
                        };
                        let reply = handler(&request);
                        let _ = tx.send(request);
                        if let Some(bytes) = reply {
                            if stream.write_all(&bytes).await.is_err() {
                                return;
                            }
                        }
                    }
                });
            }
        });

        Self {
            _dir: dir,
            path,
            requests: rx,
        }
    }

    /// Start a mock server that echoes the method name back as a string result
    pub async fn echo() -> Self {
        Self::with_handler(|req| {
            Some(mock_response(Response::success(
                Dispatched::new(req.method.clone(), unixrpc_core::ResultType::String),
                req.id,
            )))
        })
        .await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next request the server received
    pub async fn next_request(&mut self) -> Option<Request> {
        self.requests.recv().await
    }
}

/// Encode a response for a handler to send
pub fn mock_response(response: Response) -> Vec<u8> {
    codec::encode_response(&response).unwrap()
}
