//! Interactive client loop
//!
//! Reads request file names line by line, sends each request over one
//! connection and prints the outcome. Generic over its input and output so it
//! can be driven from tests. Input is read asynchronously so waiting for the
//! next line never blocks a runtime worker.

use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use unixrpc_client::{request_file, UnixRpcClient};
use unixrpc_core::{Error, Response};

const PROMPT: &str = "> Enter JSON filename: ";

/// Run rounds until `exit`, end of input, or a lost connection
///
/// File and per-round protocol errors are printed and the loop moves on to
/// the next prompt. Errors that leave the connection unusable end the loop
/// and are returned.
pub async fn run<R, W>(
    client: &mut UnixRpcClient,
    base_dir: &Path,
    mut input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            writeln!(output)?;
            break;
        }
        let name = line.trim_end_matches(['\r', '\n']);
        if name == "exit" {
            writeln!(output, "Exiting client.")?;
            break;
        }

        let request = match request_file::load(base_dir, name) {
            Ok(request) => request,
            Err(e) => {
                writeln!(output, "Error reading file: {}", e)?;
                continue;
            }
        };

        match client.call(&request).await {
            Ok(response) => print_response(&mut output, &response)?,
            Err(e) if e.is_recoverable() => {
                writeln!(output, "Error receiving response: {}", e)?;
            }
            Err(e) => {
                writeln!(output, "Error receiving response: {}", e)?;
                return Err(lost_connection(e));
            }
        }
    }

    writeln!(output, "Closing socket")?;
    Ok(())
}

fn print_response<W: Write>(output: &mut W, response: &Response) -> std::io::Result<()> {
    match response.error {
        Some(ref error) if !error.is_empty() => {
            writeln!(output, "Server responded with error: {}", error)
        }
        _ => {
            let results = response
                .results
                .as_ref()
                .map_or_else(|| "<nil>".to_string(), ToString::to_string);
            let tag = response.result_type.map_or("", |t| t.as_str());
            writeln!(output, "Server response: {} (Type: {})", results, tag)
        }
    }
}

fn lost_connection(error: Error) -> anyhow::Error {
    tracing::error!(error = %error, "Connection to server lost");
    anyhow::Error::new(error).context("connection to server lost")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;
    use unixrpc_server::UnixRpcServer;

    async fn setup() -> (TempDir, PathBuf, UnixRpcClient) {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("rpc.sock");
        let server = UnixRpcServer::builder().bind(&socket).build().await.unwrap();
        tokio::spawn(async move {
            let _ = server.run().await;
        });

        let base = dir.path().join("json");
        std::fs::create_dir(&base).unwrap();
        std::fs::write(
            base.join("floor.json"),
            r#"{"method": "floor", "params": [3.7], "param_types": ["float"], "id": 1}"#,
        )
        .unwrap();
        std::fs::write(
            base.join("sort.json"),
            r#"{"method": "sort", "params": ["b", "c", "a"], "param_types": ["string[]"], "id": 2}"#,
        )
        .unwrap();
        std::fs::write(
            base.join("unknown.json"),
            r#"{"method": "nope", "params": [], "param_types": [], "id": 3}"#,
        )
        .unwrap();
        std::fs::write(base.join("broken.json"), "{\"method\": ").unwrap();

        let client = UnixRpcClient::connect(&socket).await.unwrap();
        (dir, base, client)
    }

    async fn drive(input: &str) -> String {
        let (_dir, base, mut client) = setup().await;
        let mut output = Vec::new();
        run(&mut client, &base, Cursor::new(input.to_string()), &mut output)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_successful_rounds() {
        let output = drive("floor\nsort\nexit\n").await;

        assert!(output.contains("Server response: 3 (Type: int)"));
        assert!(output.contains("Server response: [a b c] (Type: string[])"));
        assert!(output.contains("Exiting client."));
        assert!(output.ends_with("Closing socket\n"));
    }

    #[tokio::test]
    async fn test_error_response_printed() {
        let output = drive("unknown\nexit\n").await;
        assert!(output.contains(
            "Server responded with error: Error executing method: unknown method: nope"
        ));
    }

    #[tokio::test]
    async fn test_file_errors_do_not_end_loop() {
        let output = drive("missing\nbroken\nfloor\nexit\n").await;

        assert_eq!(output.matches("Error reading file:").count(), 2);
        assert!(output.contains("Server response: 3 (Type: int)"));
    }

    #[tokio::test]
    async fn test_end_of_input_ends_loop() {
        let output = drive("floor\n").await;
        assert!(output.contains("Server response: 3 (Type: int)"));
        assert_eq!(output.matches(PROMPT).count(), 2);
        assert!(output.ends_with("Closing socket\n"));
    }

    #[tokio::test]
    async fn test_waiting_for_input_leaves_runtime_free() {
        // Single-threaded runtime: the feeder and the server only make
        // progress if the loop yields while waiting for a line.
        let (_dir, base, mut client) = setup().await;
        let (reader, mut writer) = tokio::io::duplex(64);
        let feeder = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            writer.write_all(b"floor\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            writer.write_all(b"exit\n").await.unwrap();
        });

        let mut output = Vec::new();
        run(&mut client, &base, tokio::io::BufReader::new(reader), &mut output)
            .await
            .unwrap();
        feeder.await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Server response: 3 (Type: int)"));
        assert!(output.contains("Exiting client."));
    }
}
