//! Connection session handling
//!
//! A session owns one accepted connection for its whole life and runs a
//! strictly sequential loop:
//!
//! 1. **Read**: one `read` of up to `max_message_size` bytes
//! 2. **Decode**: those bytes are taken as exactly one encoded request
//! 3. **Dispatch**: route the method and parameters through the [`Router`]
//! 4. **Reply**: encode the response and write it back in one `write_all`
//!
//! No request is read until the previous response has been written, so there
//! is never more than one call in flight per connection.
//!
//! # Framing
//!
//! There is no length prefix and no delimiter: one read is one message. A
//! request larger than the buffer arrives truncated and fails to decode, and
//! two requests that land in the same read decode as trailing garbage. Both
//! end the session. This matches the behavior existing clients rely on.
//!
//! # Termination
//!
//! - End of stream: the session returns `Ok(())`
//! - Decode failure: no response is written, the session returns
//!   [`Error::Codec`]
//! - Read or write failure: the session returns [`Error::Transport`]
//!
//! Unknown methods and bad arguments are not termination reasons. They come
//! back inside a response with the request's `id`, and the loop continues.

use crate::metrics::ServerMetrics;
use crate::router::Router;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use unixrpc_core::{codec, Error, Request, Response, Result};

/// Run one session until the peer disconnects or a protocol error occurs
#[tracing::instrument(skip(stream, router, metrics), fields(conn_id = conn_id))]
pub async fn handle_connection<S>(
    mut stream: S,
    conn_id: u64,
    router: Router,
    max_message_size: usize,
    metrics: Option<Arc<ServerMetrics>>,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tracing::info!("Connection established");
    let mut buffer = vec![0u8; max_message_size];

    loop {
        let n = stream
            .read(&mut buffer)
            .await
            .map_err(|e| Error::Transport(format!("failed to read request: {}", e)))?;
        if n == 0 {
            tracing::info!("Client closed the connection");
            return Ok(());
        }

        let start = Instant::now();
        let request = codec::decode_request(&buffer[..n])?;
        tracing::debug!(
            method = %request.method,
            id = request.id,
            params = request.params.len(),
            "Received request"
        );

        let method = request.method.clone();
        let response = process_request(request, &router);
        let bytes = codec::encode_response(&response)?;
        stream
            .write_all(&bytes)
            .await
            .map_err(|e| Error::Transport(format!("failed to send response: {}", e)))?;

        tracing::debug!(
            id = response.id,
            success = response.is_success(),
            "Sent response"
        );

        if let Some(ref m) = metrics {
            let status = if response.is_success() { "success" } else { "error" };
            m.record_request(&method, status, start.elapsed().as_secs_f64());
        }
    }
}

/// Dispatch a decoded request and build its response
fn process_request(request: Request, router: &Router) -> Response {
    let outcome = router.dispatch(&request.method, &request.params);
    if let Err(ref e) = outcome {
        tracing::warn!(method = %request.method, id = request.id, error = %e, "Method call failed");
    }
    Response::from_outcome(outcome, request.id)
}
