//! [`ServiceClient`] — typed client for the reckond calculator and journal services.
//!
//! Proto ↔ native conversions are centralized in [`crate::server::convert`];
//! this module owns the inverse of the server's status classifier, so
//! callers branch on [`ReckonerError`] variants rather than message text.

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use tonic::transport::Channel;

use crate::server::convert;
use crate::server::proto;
use crate::server::proto::calculator_client::CalculatorClient;
use crate::server::proto::journal_client::JournalClient;
use crate::store::{EntryDraft, EntryRecord};
use crate::{ReckonerError, Result};

/// A client for a remote reckond server.
///
/// Streaming methods hand back the response stream itself; nothing is
/// buffered, so a long decomposition arrives factor by factor.
pub struct ServiceClient {
    calculator: CalculatorClient<Channel>,
    journal: JournalClient<Channel>,
}

impl ServiceClient {
    /// Connect to a reckond server at the given address.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = ServiceClient::connect("http://127.0.0.1:50051").await?;
    /// ```
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        let channel = Channel::from_shared(addr.clone())
            .map_err(|e| ReckonerError::Configuration(format!("invalid address {addr}: {e}")))?
            .connect()
            .await
            .map_err(|e| ReckonerError::Internal(format!("failed to connect to {addr}: {e}")))?;
        Ok(Self {
            calculator: CalculatorClient::new(channel.clone()),
            journal: JournalClient::new(channel),
        })
    }
}

/// Convert [`tonic::Status`] back to [`ReckonerError`].
fn from_status(status: tonic::Status) -> ReckonerError {
    let message = status.message().to_string();
    match status.code() {
        tonic::Code::InvalidArgument => ReckonerError::InvalidArgument(message),
        tonic::Code::NotFound => ReckonerError::NotFound(message),
        tonic::Code::Internal => ReckonerError::Internal(message),
        code => ReckonerError::Unknown(format!("{code:?}: {message}")),
    }
}

// =============================================================================
// Calculator methods
// =============================================================================

impl ServiceClient {
    /// Unary: add two numbers.
    pub async fn sum(&self, first: i64, second: i64) -> Result<i64> {
        let request = proto::SumRequest {
            first_number: first,
            second_number: second,
        };
        let response = self
            .calculator
            .clone()
            .sum(request)
            .await
            .map_err(from_status)?;
        Ok(response.into_inner().sum_result)
    }

    /// Server-stream: the prime factors of `number`, smallest first.
    ///
    /// An input of 1 or below produces an empty stream, not an error.
    pub async fn prime_number_decomposition(
        &self,
        number: i64,
    ) -> Result<BoxStream<'static, Result<i64>>> {
        let request = proto::PrimeNumberDecompositionRequest { number };
        let response = self
            .calculator
            .clone()
            .prime_number_decomposition(request)
            .await
            .map_err(from_status)?;
        let stream = response
            .into_inner()
            .map(|item| item.map(|r| r.prime_factor).map_err(from_status));
        Ok(Box::pin(stream))
    }

    /// Client-stream: send every number, receive the single final average.
    pub async fn compute_average(&self, numbers: impl IntoIterator<Item = i64>) -> Result<f64> {
        let requests: Vec<proto::ComputeAverageRequest> = numbers
            .into_iter()
            .map(|number| proto::ComputeAverageRequest { number })
            .collect();
        let response = self
            .calculator
            .clone()
            .compute_average(tokio_stream::iter(requests))
            .await
            .map_err(from_status)?;
        Ok(response.into_inner().average)
    }

    /// Bidirectional-stream: send every number, receive one running
    /// maximum per number, in order.
    pub async fn find_maximum(
        &self,
        numbers: impl IntoIterator<Item = i64>,
    ) -> Result<BoxStream<'static, Result<i64>>> {
        let requests: Vec<proto::FindMaximumRequest> = numbers
            .into_iter()
            .map(|number| proto::FindMaximumRequest { number })
            .collect();
        let response = self
            .calculator
            .clone()
            .find_maximum(tokio_stream::iter(requests))
            .await
            .map_err(from_status)?;
        let stream = response
            .into_inner()
            .map(|item| item.map(|r| r.maximum).map_err(from_status));
        Ok(Box::pin(stream))
    }

    /// Unary with an error path: fails with
    /// [`ReckonerError::InvalidArgument`] for negative input.
    pub async fn square_root(&self, number: i64) -> Result<f64> {
        let request = proto::SquareRootRequest { number };
        let response = self
            .calculator
            .clone()
            .square_root(request)
            .await
            .map_err(from_status)?;
        Ok(response.into_inner().number_root)
    }

    /// Liveness probe; returns `(healthy, server version)`.
    pub async fn health(&self) -> Result<(bool, String)> {
        let response = self
            .calculator
            .clone()
            .health(proto::HealthRequest {})
            .await
            .map_err(from_status)?;
        let inner = response.into_inner();
        Ok((inner.healthy, inner.version))
    }
}

// =============================================================================
// Journal methods
// =============================================================================

impl ServiceClient {
    /// Create an entry; the returned record carries the assigned id.
    pub async fn create_entry(&self, draft: EntryDraft) -> Result<EntryRecord> {
        let request = proto::CreateEntryRequest {
            entry: Some(proto::Entry {
                id: String::new(),
                author_id: draft.author_id,
                title: draft.title,
                content: draft.content,
            }),
        };
        let response = self
            .journal
            .clone()
            .create_entry(request)
            .await
            .map_err(from_status)?;
        entry_from_response(response.into_inner().entry)
    }

    /// Fetch an entry by id.
    pub async fn read_entry(&self, id: u64) -> Result<EntryRecord> {
        let request = proto::ReadEntryRequest {
            entry_id: id.to_string(),
        };
        let response = self
            .journal
            .clone()
            .read_entry(request)
            .await
            .map_err(from_status)?;
        entry_from_response(response.into_inner().entry)
    }

    /// Replace the fields of an existing entry.
    pub async fn update_entry(&self, record: &EntryRecord) -> Result<EntryRecord> {
        let request = proto::UpdateEntryRequest {
            entry: Some(convert::entry_to_proto(record)),
        };
        let response = self
            .journal
            .clone()
            .update_entry(request)
            .await
            .map_err(from_status)?;
        entry_from_response(response.into_inner().entry)
    }

    /// Delete an entry by id.
    pub async fn delete_entry(&self, id: u64) -> Result<()> {
        let request = proto::DeleteEntryRequest {
            entry_id: id.to_string(),
        };
        self.journal
            .clone()
            .delete_entry(request)
            .await
            .map_err(from_status)?;
        Ok(())
    }

    /// Stream every stored entry.
    pub async fn list_entries(&self) -> Result<BoxStream<'static, Result<EntryRecord>>> {
        let response = self
            .journal
            .clone()
            .list_entries(proto::ListEntriesRequest {})
            .await
            .map_err(from_status)?;
        let stream = response.into_inner().map(|item| {
            item.map_err(from_status)
                .and_then(|r| entry_from_response(r.entry))
        });
        Ok(Box::pin(stream))
    }
}

fn entry_from_response(entry: Option<proto::Entry>) -> Result<EntryRecord> {
    let entry =
        entry.ok_or_else(|| ReckonerError::Internal("response carried no entry".to_string()))?;
    convert::entry_from_proto(entry)
}
