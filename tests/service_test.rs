//! Integration tests for the calculator service.
//!
//! Starts an in-process reckond server and connects with a
//! [`ServiceClient`], validating each interaction pattern end to end.

#![cfg(all(feature = "server", feature = "client"))]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::StreamExt;
use reckoner::ReckonerError;
use reckoner::client::ServiceClient;
use reckoner::server::CalculatorService;
use reckoner::server::proto::calculator_server::CalculatorServer;
use tokio::net::TcpListener;
use tonic::transport::Server;

/// Find an available port for testing.
async fn find_available_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start a test server on a random port and return the address string.
async fn start_test_server() -> String {
    let addr = find_available_port().await;
    let addr_str = format!("http://{addr}");

    tokio::spawn(async move {
        Server::builder()
            .add_service(CalculatorServer::new(CalculatorService::new()))
            .serve(addr)
            .await
            .unwrap();
    });

    // Give the server a moment to bind.
    tokio::time::sleep(Duration::from_millis(100)).await;

    addr_str
}

async fn connect() -> ServiceClient {
    let addr = start_test_server().await;
    ServiceClient::connect(&addr).await.unwrap()
}

#[tokio::test]
async fn sum_round_trip() {
    let client = connect().await;
    assert_eq!(client.sum(56, 8).await.unwrap(), 64);
}

#[tokio::test]
async fn decomposition_streams_factors_in_order() {
    let client = connect().await;
    let factors: Vec<i64> = client
        .prime_number_decomposition(222_141)
        .await
        .unwrap()
        .map(|f| f.unwrap())
        .collect()
        .await;
    assert_eq!(factors, vec![3, 74_047]);
}

#[tokio::test]
async fn decomposition_of_one_is_an_empty_stream() {
    let client = connect().await;
    let factors: Vec<reckoner::Result<i64>> = client
        .prime_number_decomposition(1)
        .await
        .unwrap()
        .collect()
        .await;
    // Zero elements and a clean end-of-stream: success, not an error.
    assert!(factors.is_empty(), "got: {factors:?}");
}

#[tokio::test]
async fn decomposition_survives_an_early_hangup() {
    let client = connect().await;
    let mut factors = client.prime_number_decomposition(720).await.unwrap();
    assert_eq!(factors.next().await.unwrap().unwrap(), 2);
    assert_eq!(factors.next().await.unwrap().unwrap(), 2);
    // Dropping the stream mid-sequence closes our end; the server side
    // stops producing without surfacing an error anywhere.
    drop(factors);
}

#[tokio::test]
async fn average_of_streamed_numbers() {
    let client = connect().await;
    let average = client.compute_average([3, 5, 9, 54, 23]).await.unwrap();
    assert_eq!(average, 18.8);
}

#[tokio::test]
async fn average_of_empty_stream_is_invalid_argument() {
    let client = connect().await;
    let err = client.compute_average([]).await.unwrap_err();
    assert!(matches!(err, ReckonerError::InvalidArgument(_)), "got: {err}");
}

#[tokio::test]
async fn maxima_come_back_one_per_input_in_order() {
    let client = connect().await;
    let maxima: Vec<i64> = client
        .find_maximum([4, 7, 2, 19, 4, 6, 32])
        .await
        .unwrap()
        .map(|m| m.unwrap())
        .collect()
        .await;
    assert_eq!(maxima, vec![4, 7, 7, 19, 19, 19, 32]);
}

#[tokio::test]
async fn square_root_round_trip() {
    let client = connect().await;
    assert_eq!(client.square_root(9).await.unwrap(), 3.0);
}

#[tokio::test]
async fn square_root_of_negative_is_invalid_argument_with_the_value() {
    let client = connect().await;
    let err = client.square_root(-2).await.unwrap_err();
    match err {
        ReckonerError::InvalidArgument(msg) => {
            assert!(msg.contains("-2"), "message was: {msg}");
        }
        other => panic!("expected InvalidArgument, got: {other}"),
    }
}

#[tokio::test]
async fn health_reports_version() {
    let client = connect().await;
    let (healthy, version) = client.health().await.unwrap();
    assert!(healthy, "server should report healthy");
    assert_eq!(version, reckoner::PKG_VERSION);
}
