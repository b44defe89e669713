//! Reckoner — calculator demo service covering the four gRPC interaction patterns
//!
//! One RPC per pattern: `Sum` (unary), `PrimeNumberDecomposition`
//! (server-stream), `ComputeAverage` (client-stream), and `FindMaximum`
//! (bidirectional-stream), plus `SquareRoot` to demonstrate the structured
//! error contract. A second `Journal` service shows CRUD with a streaming
//! list over a pluggable [`RecordStore`].
//!
//! # Client Example
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use reckoner::client::ServiceClient;
//!
//! #[tokio::main]
//! async fn main() -> reckoner::Result<()> {
//!     let client = ServiceClient::connect("http://127.0.0.1:50051").await?;
//!
//!     println!("56 + 8 = {}", client.sum(56, 8).await?);
//!
//!     let mut factors = client.prime_number_decomposition(222_141).await?;
//!     while let Some(factor) = factors.next().await {
//!         println!("prime factor: {}", factor?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod server;
pub mod store;
pub mod telemetry;

#[cfg(feature = "client")]
pub mod client;

// Re-export main types at crate root
pub use error::{ReckonerError, Result};
pub use store::{EntryDraft, EntryRecord, MemoryStore, RecordStore};

/// Crate version, as reported by the `Health` RPC.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
