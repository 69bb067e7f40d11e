use thiserror::Error;

use crate::stream::StreamEnd;
use crate::wire::{OrganizePayload, SaveResponse};

/// Handle of the assistant message a stream is feeding. Mirrors the core
/// crate's alias; the app layer bridges the two.
pub type MessageId = u64;

/// One history entry as handed to the engine for a chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// `user` or `assistant`.
    pub role: String,
    pub content: String,
    /// Inline data URLs; non-empty entries serialize as multipart content.
    pub images: Vec<String>,
}

/// Failure at the HTTP boundary, before protocol frames enter the picture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
}

/// Failure of an organize/save round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The backend answered but reported the operation failed.
    #[error("{0}")]
    Backend(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// One accepted content delta for the in-flight assistant message.
    ChatDelta { message_id: MessageId, text: String },
    /// The stream ended: completed normally or terminated by an error frame.
    ChatStreamEnded {
        message_id: MessageId,
        end: StreamEnd,
    },
    /// The transport failed before or during the read.
    ChatStreamFailed {
        message_id: MessageId,
        error: TransportError,
    },
    OrganizeFinished {
        result: Result<OrganizePayload, WorkflowError>,
    },
    SaveFinished {
        result: Result<SaveResponse, WorkflowError>,
    },
}
