use crate::message::{ChatMessage, MessageId};
use crate::state::IngestTarget;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the chat stream; deltas apply to the message named by the handle.
    /// `history` is the conversation up to and including the new user
    /// message, excluding the still-empty assistant placeholder.
    OpenChatStream {
        message_id: MessageId,
        history: Vec<ChatMessage>,
    },
    /// Ask the organize collaborator to structure the raw notes.
    RequestOrganize { raw_notes: String },
    /// Ask the save collaborator to persist.
    RequestSave { request: SaveRequest },
}

/// Domain-level save request; the engine maps it onto the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub message: String,
    pub sync_to_obsidian: bool,
    pub target: IngestTarget,
    pub destination_path: Option<String>,
    pub organized_markdown: Option<String>,
    pub organized_title: Option<String>,
    pub confirm_write: Option<bool>,
}
