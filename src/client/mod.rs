//! Client library for connecting to reckond.
//!
//! Provides [`ServiceClient`], a typed wrapper over the generated gRPC
//! clients that maps wire statuses back into [`ReckonerError`](crate::ReckonerError).

mod service_client;

pub use service_client::ServiceClient;
