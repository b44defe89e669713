//! Reckoner error types

/// Reckoner error types.
///
/// The variants mirror the closed status vocabulary exposed over the wire;
/// translation to and from [`tonic::Status`] happens in exactly one place
/// per direction (`server::convert` for outgoing, `client` for incoming).
#[derive(Debug, thiserror::Error)]
pub enum ReckonerError {
    /// Caller supplied a value outside the documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced entity is absent from the record store.
    #[error("not found: {0}")]
    NotFound(String),

    /// Collaborator or transport failure not attributable to caller input.
    #[error("internal error: {0}")]
    Internal(String),

    /// The inbound half of a streaming call failed before end-of-stream.
    #[error("stream error: {0}")]
    Stream(String),

    /// Configuration file missing, unreadable, or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Last-resort fallback; must be logged, never silently discarded.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for reckoner operations
pub type Result<T> = std::result::Result<T, ReckonerError>;
