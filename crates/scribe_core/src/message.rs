/// Stable handle to one entry in the message history.
///
/// Stream deltas and terminal stream events address the in-flight assistant
/// message through its id, never through its position in the history.
pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Backend bookkeeping attached to a save summary message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageMeta {
    pub cards_created: Option<u32>,
    pub session_saved: bool,
    pub session_id: Option<String>,
}

/// One entry in the append-only message history.
///
/// The content of the in-flight assistant message grows while its stream is
/// open; every other message is immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    /// Inline-encoded data URLs attached to an outgoing user message.
    pub images: Vec<String>,
    pub meta: Option<MessageMeta>,
}

impl ChatMessage {
    pub fn user(id: MessageId, content: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            images,
            meta: None,
        }
    }

    pub fn assistant(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: content.into(),
            images: Vec::new(),
            meta: None,
        }
    }
}

/// What the save collaborator reported back after a write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveOutcome {
    pub response: String,
    pub cards_created: Option<u32>,
    pub session_saved: bool,
    pub session_id: Option<String>,
    pub obsidian_synced: Option<bool>,
    pub obsidian_error: Option<String>,
}
