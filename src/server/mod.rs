//! gRPC server and shared proto types.
//!
//! This module provides:
//! - Generated protobuf types (`proto`) used by both server and client
//! - The status classifier and proto type conversions (`convert`)
//! - The calculator service implementation (`service`, server-only)
//! - The journal service implementation (`journal`, server-only)
//! - Configuration types (`config`, server-only)

#[cfg(feature = "server")]
pub mod config;
pub mod convert;
#[cfg(feature = "server")]
pub mod journal;
#[cfg(feature = "server")]
pub mod service;

/// Re-exported generated proto types.
pub mod proto {
    tonic::include_proto!("reckoner.v1");
}

#[cfg(feature = "server")]
pub use journal::JournalService;
#[cfg(feature = "server")]
pub use service::CalculatorService;
