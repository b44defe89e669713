//! Integration tests for the journal service.
//!
//! Each test starts its own in-process server over a fresh
//! [`MemoryStore`], so state never leaks between tests.

#![cfg(all(feature = "server", feature = "client"))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reckoner::client::ServiceClient;
use reckoner::server::JournalService;
use reckoner::server::proto::journal_server::JournalServer;
use reckoner::{EntryDraft, MemoryStore, ReckonerError};
use tokio::net::TcpListener;
use tonic::transport::Server;

async fn start_test_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    let addr_str = format!("http://{addr}");

    let journal = JournalService::new(Arc::new(MemoryStore::new()));
    tokio::spawn(async move {
        Server::builder()
            .add_service(JournalServer::new(journal))
            .serve(addr)
            .await
            .unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    addr_str
}

async fn connect() -> ServiceClient {
    let addr = start_test_server().await;
    ServiceClient::connect(&addr).await.unwrap()
}

fn draft(title: &str) -> EntryDraft {
    EntryDraft {
        author_id: "tester".into(),
        title: title.into(),
        content: "body".into(),
    }
}

#[tokio::test]
async fn create_then_read_round_trip() {
    let client = connect().await;
    let created = client.create_entry(draft("hello")).await.unwrap();
    assert!(created.id > 0, "server should assign an id");

    let read = client.read_entry(created.id).await.unwrap();
    assert_eq!(read, created);
}

#[tokio::test]
async fn read_of_missing_entry_is_not_found() {
    let client = connect().await;
    let err = client.read_entry(4242).await.unwrap_err();
    assert!(matches!(err, ReckonerError::NotFound(_)), "got: {err}");
}

#[tokio::test]
async fn malformed_id_is_invalid_argument() {
    use reckoner::server::proto;
    use reckoner::server::proto::journal_client::JournalClient;

    // The typed client can only send well-formed ids, so go through the
    // raw generated client for this one.
    let addr = start_test_server().await;
    let mut grpc_client = JournalClient::connect(addr).await.unwrap();

    let status = grpc_client
        .read_entry(proto::ReadEntryRequest {
            entry_id: "not-an-id".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::InvalidArgument);
    assert!(
        status.message().contains("not-an-id"),
        "message was: {}",
        status.message()
    );
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_id() {
    let client = connect().await;
    let mut created = client.create_entry(draft("before")).await.unwrap();

    created.title = "after".into();
    let updated = client.update_entry(&created).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "after");

    assert_eq!(client.read_entry(created.id).await.unwrap().title, "after");
}

#[tokio::test]
async fn update_of_missing_entry_is_not_found() {
    let client = connect().await;
    let mut ghost = client.create_entry(draft("ghost")).await.unwrap();
    client.delete_entry(ghost.id).await.unwrap();

    ghost.title = "still here?".into();
    let err = client.update_entry(&ghost).await.unwrap_err();
    assert!(matches!(err, ReckonerError::NotFound(_)), "got: {err}");
}

#[tokio::test]
async fn delete_then_read_misses() {
    let client = connect().await;
    let created = client.create_entry(draft("short-lived")).await.unwrap();
    client.delete_entry(created.id).await.unwrap();

    let err = client.read_entry(created.id).await.unwrap_err();
    assert!(matches!(err, ReckonerError::NotFound(_)), "got: {err}");

    // A second delete is a miss too, not a silent success.
    let err = client.delete_entry(created.id).await.unwrap_err();
    assert!(matches!(err, ReckonerError::NotFound(_)), "got: {err}");
}

#[tokio::test]
async fn list_streams_every_entry() {
    let client = connect().await;
    for title in ["one", "two", "three"] {
        client.create_entry(draft(title)).await.unwrap();
    }

    let titles: Vec<String> = client
        .list_entries()
        .await
        .unwrap()
        .map(|entry| entry.unwrap().title)
        .collect()
        .await;
    assert_eq!(titles, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn list_of_empty_store_is_an_empty_stream() {
    let client = connect().await;
    let entries: Vec<_> = client.list_entries().await.unwrap().collect().await;
    assert!(entries.is_empty());
}
