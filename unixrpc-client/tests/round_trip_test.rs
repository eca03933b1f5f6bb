//! Client round-trip integration tests
//!
//! Success, error responses, timeouts and request files against a mock
//! server.

mod common;

use common::{mock_response, MockUnixServer};
use std::time::Duration;
use unixrpc_client::{request_file, ClientBuilder, UnixRpcClient};
use unixrpc_core::{Error, Response, Value};

#[tokio::test]
async fn test_request_reaches_server_intact() {
    let mut server = MockUnixServer::echo().await;
    let mut client = UnixRpcClient::connect(server.path()).await.unwrap();

    let response = client
        .request("sort", vec![Value::from("b"), Value::from("a")])
        .await
        .unwrap();
    assert_eq!(response.results, Some(Value::from("sort")));

    let seen = server.next_request().await.unwrap();
    assert_eq!(seen.method, "sort");
    assert_eq!(seen.params, vec![Value::from("b"), Value::from("a")]);
    assert_eq!(seen.id, response.id);
}

#[tokio::test]
async fn test_error_response_is_not_a_client_error() {
    let server = MockUnixServer::with_handler(|req| {
        Some(mock_response(Response::failure(
            "Error executing method: unknown method: nope",
            req.id,
        )))
    })
    .await;
    let mut client = UnixRpcClient::connect(server.path()).await.unwrap();

    let response = client.request("nope", vec![]).await.unwrap();
    assert!(response.is_error());
    assert!(response.results.is_none());
    assert_eq!(
        response.error.as_deref(),
        Some("Error executing method: unknown method: nope")
    );
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let server = MockUnixServer::with_handler(|_| None).await;
    let mut client = ClientBuilder::new(server.path())
        .timeout(Duration::from_millis(50))
        .connect()
        .await
        .unwrap();

    let result = client.request("floor", vec![Value::from(1.5)]).await;
    assert_eq!(result, Err(Error::Timeout));
    assert!(Error::Timeout.is_recoverable());
}

#[tokio::test]
async fn test_request_file_round_trip() {
    let mut server = MockUnixServer::echo().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("reverse.json"),
        r#"{"method": "reverse", "params": ["hello"], "param_types": ["string"], "id": 42}"#,
    )
    .unwrap();

    let request = request_file::load(dir.path(), "reverse").unwrap();
    let mut client = UnixRpcClient::connect(server.path()).await.unwrap();
    let response = client.call(&request).await.unwrap();

    assert_eq!(response.id, 42);
    let seen = server.next_request().await.unwrap();
    assert_eq!(seen.param_types, vec!["string".to_string()]);
}
