//! Calculator gRPC service — one handler per interaction pattern.
//!
//! Streaming handlers follow one shape: a bounded mpsc channel carries the
//! outbound direction, and a single task per call owns both the inbound
//! loop and the call's accumulator, so observation and emission stay
//! serialised with no mutable state shared between tasks. The channel
//! bound turns peer backpressure into a suspended producer, and a failed
//! `send` means the peer closed the response stream, which ends
//! production without error.

use std::pin::Pin;

use futures_util::Stream;
use metrics::counter;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::debug;

use super::convert;
use super::proto::calculator_server::Calculator;
use super::proto::{
    ComputeAverageRequest, ComputeAverageResponse, FindMaximumRequest, FindMaximumResponse,
    HealthRequest, HealthResponse, PrimeNumberDecompositionRequest,
    PrimeNumberDecompositionResponse, SquareRootRequest, SquareRootResponse, SumRequest,
    SumResponse,
};
use crate::ReckonerError;
use crate::engine::{self, RunningAverage, RunningMax};
use crate::telemetry;

/// Boxed outbound half of a streaming response.
type ResponseStream<T> = Pin<Box<dyn Stream<Item = Result<T, Status>> + Send>>;

/// Outbound channel capacity per streaming call. Once the peer stops
/// draining this many undelivered messages, the producing task suspends.
const STREAM_BUFFER: usize = 16;

/// The calculator service.
///
/// Stateless by construction: each streaming call owns a fresh accumulator
/// scoped to its own session task, so no state crosses call boundaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalculatorService;

impl CalculatorService {
    /// Create a new calculator service.
    pub fn new() -> Self {
        Self
    }
}

// =============================================================================
// Session loops — one per streaming pattern, unit-tested below
// =============================================================================

/// Produce the prime factors of `number`, one message at a time.
async fn factor_session(
    number: i64,
    out: mpsc::Sender<Result<PrimeNumberDecompositionResponse, Status>>,
) {
    for prime_factor in engine::prime_factors(number) {
        let response = PrimeNumberDecompositionResponse { prime_factor };
        if out.send(Ok(response)).await.is_err() {
            debug!(number, "peer closed the stream mid-decomposition");
            return;
        }
        counter!(
            telemetry::STREAM_MESSAGES_TOTAL,
            "method" => "prime_number_decomposition",
            "direction" => "outbound"
        )
        .increment(1);
    }
    // Dropping `out` on return signals end-of-stream; an input that
    // yielded no factors still ends cleanly here.
}

/// Drain the inbound half of a ComputeAverage call into one final average.
///
/// An inbound failure before end-of-stream aborts the call: no final
/// response is ever produced from a partial stream. A stream that ends
/// without a single observation has no average, which is the caller's
/// mistake rather than ours.
async fn average_session<S>(mut inbound: S) -> Result<f64, ReckonerError>
where
    S: Stream<Item = Result<ComputeAverageRequest, Status>> + Unpin,
{
    let mut accumulator = RunningAverage::new();
    while let Some(message) = inbound.next().await {
        let request = message.map_err(|e| ReckonerError::Stream(e.message().to_string()))?;
        counter!(
            telemetry::STREAM_MESSAGES_TOTAL,
            "method" => "compute_average",
            "direction" => "inbound"
        )
        .increment(1);
        accumulator.observe(request.number);
    }
    accumulator
        .result()
        .ok_or_else(|| ReckonerError::InvalidArgument("cannot average an empty stream".to_string()))
}

/// Coordinating loop for one FindMaximum call.
///
/// Observes each inbound number and immediately queues the updated
/// maximum: strictly one outbound message per inbound message, in arrival
/// order. The accumulator never leaves this task. Inbound end-of-stream
/// drops `out`, closing the outbound direction; an inbound failure emits
/// one classified status and terminates the session.
async fn maximum_session<S>(mut inbound: S, out: mpsc::Sender<Result<FindMaximumResponse, Status>>)
where
    S: Stream<Item = Result<FindMaximumRequest, Status>> + Unpin,
{
    let mut accumulator = RunningMax::new();
    while let Some(message) = inbound.next().await {
        let response = match message {
            Ok(request) => {
                counter!(
                    telemetry::STREAM_MESSAGES_TOTAL,
                    "method" => "find_maximum",
                    "direction" => "inbound"
                )
                .increment(1);
                Ok(FindMaximumResponse {
                    maximum: accumulator.observe(request.number),
                })
            }
            Err(e) => Err(convert::to_status(ReckonerError::Stream(
                e.message().to_string(),
            ))),
        };
        let terminal = response.is_err();
        if out.send(response).await.is_err() {
            debug!("peer closed the response stream; ending session");
            return;
        }
        counter!(
            telemetry::STREAM_MESSAGES_TOTAL,
            "method" => "find_maximum",
            "direction" => "outbound"
        )
        .increment(1);
        if terminal {
            return;
        }
    }
}

// =============================================================================
// Calculator trait implementation
// =============================================================================

#[tonic::async_trait]
impl Calculator for CalculatorService {
    async fn sum(&self, request: Request<SumRequest>) -> Result<Response<SumResponse>, Status> {
        let req = request.into_inner();
        let sum_result = engine::sum(req.first_number, req.second_number);
        debug!(
            first = req.first_number,
            second = req.second_number,
            sum_result,
            "sum"
        );
        counter!(telemetry::RPC_REQUESTS_TOTAL, "method" => "sum", "status" => "ok").increment(1);
        Ok(Response::new(SumResponse { sum_result }))
    }

    type PrimeNumberDecompositionStream = ResponseStream<PrimeNumberDecompositionResponse>;

    async fn prime_number_decomposition(
        &self,
        request: Request<PrimeNumberDecompositionRequest>,
    ) -> Result<Response<Self::PrimeNumberDecompositionStream>, Status> {
        let number = request.into_inner().number;
        debug!(number, "prime number decomposition");
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(factor_session(number, tx));
        counter!(
            telemetry::RPC_REQUESTS_TOTAL,
            "method" => "prime_number_decomposition",
            "status" => "ok"
        )
        .increment(1);
        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    async fn compute_average(
        &self,
        request: Request<Streaming<ComputeAverageRequest>>,
    ) -> Result<Response<ComputeAverageResponse>, Status> {
        debug!("compute average session opened");
        match average_session(request.into_inner()).await {
            Ok(average) => {
                counter!(
                    telemetry::RPC_REQUESTS_TOTAL,
                    "method" => "compute_average",
                    "status" => "ok"
                )
                .increment(1);
                Ok(Response::new(ComputeAverageResponse { average }))
            }
            Err(err) => {
                counter!(
                    telemetry::RPC_REQUESTS_TOTAL,
                    "method" => "compute_average",
                    "status" => "error"
                )
                .increment(1);
                Err(convert::to_status(err))
            }
        }
    }

    type FindMaximumStream = ResponseStream<FindMaximumResponse>;

    async fn find_maximum(
        &self,
        request: Request<Streaming<FindMaximumRequest>>,
    ) -> Result<Response<Self::FindMaximumStream>, Status> {
        debug!("find maximum session opened");
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(maximum_session(request.into_inner(), tx));
        counter!(telemetry::RPC_REQUESTS_TOTAL, "method" => "find_maximum", "status" => "ok")
            .increment(1);
        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    async fn square_root(
        &self,
        request: Request<SquareRootRequest>,
    ) -> Result<Response<SquareRootResponse>, Status> {
        let number = request.into_inner().number;
        match engine::square_root(number) {
            Ok(number_root) => {
                debug!(number, number_root, "square root");
                counter!(telemetry::RPC_REQUESTS_TOTAL, "method" => "square_root", "status" => "ok")
                    .increment(1);
                Ok(Response::new(SquareRootResponse { number_root }))
            }
            Err(err) => {
                counter!(
                    telemetry::RPC_REQUESTS_TOTAL,
                    "method" => "square_root",
                    "status" => "error"
                )
                .increment(1);
                Err(convert::to_status(err))
            }
        }
    }

    async fn health(
        &self,
        _request: Request<HealthRequest>,
    ) -> Result<Response<HealthResponse>, Status> {
        Ok(Response::new(HealthResponse {
            healthy: true,
            version: crate::PKG_VERSION.to_string(),
        }))
    }
}
