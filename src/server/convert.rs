//! Status classification and proto ↔ native conversions.
//!
//! [`to_status`] is the single point where a [`ReckonerError`] becomes a
//! wire-visible [`tonic::Status`]: every handler exit path goes through it
//! exactly once, so no raw internal failure ever reaches the transport.
//! The inverse mapping for clients lives in `crate::client`.

use tonic::Status;

use super::proto;
use crate::store::{EntryDraft, EntryRecord};
use crate::{ReckonerError, Result};

/// Classify an error into the closed status vocabulary.
pub fn to_status(err: ReckonerError) -> Status {
    match err {
        ReckonerError::InvalidArgument(msg) => Status::invalid_argument(msg),
        ReckonerError::NotFound(msg) => Status::not_found(msg),
        ReckonerError::Internal(msg) | ReckonerError::Configuration(msg) => Status::internal(msg),
        ReckonerError::Stream(msg) => Status::internal(format!("inbound stream failed: {msg}")),
        ReckonerError::Unknown(msg) => {
            // The catch-all must leave a trace before it leaves the process.
            tracing::error!(message = %msg, "unclassified failure crossing the handler boundary");
            Status::unknown(msg)
        }
    }
}

// =============================================================================
// Proto ↔ native journal entries
// =============================================================================

/// Render a stored record as a wire entry.
pub fn entry_to_proto(record: &EntryRecord) -> proto::Entry {
    proto::Entry {
        id: record.id.to_string(),
        author_id: record.author_id.clone(),
        title: record.title.clone(),
        content: record.content.clone(),
    }
}

/// Extract the caller-editable fields of a wire entry.
pub fn draft_from_proto(entry: proto::Entry) -> EntryDraft {
    EntryDraft {
        author_id: entry.author_id,
        title: entry.title,
        content: entry.content,
    }
}

/// Parse a wire entry id. Entry ids are opaque strings on the wire; a
/// string that does not denote a stored id is the caller's mistake.
pub fn parse_entry_id(id: &str) -> Result<u64> {
    id.parse()
        .map_err(|_| ReckonerError::InvalidArgument(format!("cannot parse entry id {id:?}")))
}

/// Rebuild a native record from a wire entry, id included.
pub fn entry_from_proto(entry: proto::Entry) -> Result<EntryRecord> {
    Ok(EntryRecord {
        id: parse_entry_id(&entry.id)?,
        author_id: entry.author_id,
        title: entry.title,
        content: entry.content,
    })
}
