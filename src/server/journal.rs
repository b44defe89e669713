//! Journal gRPC service — CRUD over a [`RecordStore`], with a streaming list.
//!
//! Deliberately thin: each handler parses the wire id, delegates to the
//! store, and classifies whatever comes back. The streaming list follows
//! the same channel shape as the calculator's server-stream handler.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};
use tracing::debug;

use super::convert;
use super::proto::journal_server::Journal;
use super::proto::{
    CreateEntryRequest, CreateEntryResponse, DeleteEntryRequest, DeleteEntryResponse,
    ListEntriesRequest, ListEntriesResponse, ReadEntryRequest, ReadEntryResponse,
    UpdateEntryRequest, UpdateEntryResponse,
};
use crate::store::RecordStore;
use crate::telemetry;
use crate::{ReckonerError, Result as ReckonerResult};

/// Journal service wrapping a record store implementation.
pub struct JournalService<S: RecordStore> {
    store: Arc<S>,
}

impl<S: RecordStore> JournalService<S> {
    /// Create a new service over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn record_outcome<T>(method: &'static str, result: ReckonerResult<T>) -> Result<T, Status> {
    match result {
        Ok(value) => {
            counter!(telemetry::RPC_REQUESTS_TOTAL, "method" => method, "status" => "ok")
                .increment(1);
            Ok(value)
        }
        Err(err) => {
            counter!(telemetry::RPC_REQUESTS_TOTAL, "method" => method, "status" => "error")
                .increment(1);
            Err(convert::to_status(err))
        }
    }
}

#[tonic::async_trait]
impl<S: RecordStore> Journal for JournalService<S> {
    async fn create_entry(
        &self,
        request: Request<CreateEntryRequest>,
    ) -> Result<Response<CreateEntryResponse>, Status> {
        let entry = request.into_inner().entry.unwrap_or_default();
        debug!(author_id = %entry.author_id, title = %entry.title, "create entry");
        let result = self.store.insert(convert::draft_from_proto(entry)).await;
        let record = record_outcome("create_entry", result)?;
        Ok(Response::new(CreateEntryResponse {
            entry: Some(convert::entry_to_proto(&record)),
        }))
    }

    async fn read_entry(
        &self,
        request: Request<ReadEntryRequest>,
    ) -> Result<Response<ReadEntryResponse>, Status> {
        let entry_id = request.into_inner().entry_id;
        debug!(%entry_id, "read entry");
        let result = async {
            let id = convert::parse_entry_id(&entry_id)?;
            self.store.find(id).await
        }
        .await;
        let record = record_outcome("read_entry", result)?;
        Ok(Response::new(ReadEntryResponse {
            entry: Some(convert::entry_to_proto(&record)),
        }))
    }

    async fn update_entry(
        &self,
        request: Request<UpdateEntryRequest>,
    ) -> Result<Response<UpdateEntryResponse>, Status> {
        let entry = request.into_inner().entry.unwrap_or_default();
        debug!(entry_id = %entry.id, "update entry");
        let result = async {
            let id = convert::parse_entry_id(&entry.id)?;
            self.store.replace(id, convert::draft_from_proto(entry)).await
        }
        .await;
        let record = record_outcome("update_entry", result)?;
        Ok(Response::new(UpdateEntryResponse {
            entry: Some(convert::entry_to_proto(&record)),
        }))
    }

    async fn delete_entry(
        &self,
        request: Request<DeleteEntryRequest>,
    ) -> Result<Response<DeleteEntryResponse>, Status> {
        let entry_id = request.into_inner().entry_id;
        debug!(%entry_id, "delete entry");
        let result = async {
            let id = convert::parse_entry_id(&entry_id)?;
            self.store.delete(id).await
        }
        .await;
        record_outcome("delete_entry", result)?;
        Ok(Response::new(DeleteEntryResponse { entry_id }))
    }

    type ListEntriesStream = ReceiverStream<Result<ListEntriesResponse, Status>>;

    async fn list_entries(
        &self,
        _request: Request<ListEntriesRequest>,
    ) -> Result<Response<Self::ListEntriesStream>, Status> {
        debug!("list entries");
        let scan = self.store.scan().await;
        let mut records = record_outcome("list_entries", scan)?;

        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            while let Some(record) = records.next().await {
                let item = match record {
                    Ok(record) => Ok(ListEntriesResponse {
                        entry: Some(convert::entry_to_proto(&record)),
                    }),
                    Err(err) => Err(convert::to_status(ReckonerError::Internal(format!(
                        "scan failed mid-stream: {err}"
                    )))),
                };
                let terminal = item.is_err();
                if tx.send(item).await.is_err() || terminal {
                    // Peer hung up or the scan died; stop either way.
                    return;
                }
                counter!(
                    telemetry::STREAM_MESSAGES_TOTAL,
                    "method" => "list_entries",
                    "direction" => "outbound"
                )
                .increment(1);
            }
        });
        Ok(Response::new(ReceiverStream::new(rx)))
    }
}
