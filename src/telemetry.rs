//! Telemetry metric name constants.
//!
//! Centralised metric names for reckoner RPC handling. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `reckoner_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `method` — RPC method name in snake_case (e.g. "sum", "find_maximum")
//! - `status` — outcome: "ok" or "error"
//! - `direction` — streamed message direction: "inbound" or "outbound"

/// Total RPCs handled.
///
/// Labels: `method`, `status` ("ok" | "error").
pub const RPC_REQUESTS_TOTAL: &str = "reckoner_rpc_requests_total";

/// Total messages carried on streaming RPCs.
///
/// Labels: `method`, `direction` ("inbound" | "outbound").
pub const STREAM_MESSAGES_TOTAL: &str = "reckoner_stream_messages_total";
