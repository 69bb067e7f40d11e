use crate::message::{ChatMessage, MessageId, MessageMeta, Role, SaveOutcome};
use crate::preview::{PreviewPhase, PreviewState};
use crate::view_model::AppViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Chat,
    Ingest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestTarget {
    Anki,
    Obsidian,
    #[default]
    Both,
}

impl IngestTarget {
    /// Wire string for the save collaborator's `mode` field.
    pub fn wire_name(self) -> &'static str {
        match self {
            IngestTarget::Anki => "anki",
            IngestTarget::Obsidian => "obsidian",
            IngestTarget::Both => "all",
        }
    }

    pub fn syncs_to_obsidian(self) -> bool {
        matches!(self, IngestTarget::Obsidian | IngestTarget::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    messages: Vec<ChatMessage>,
    next_message_id: MessageId,
    mode: Mode,
    target: IngestTarget,
    /// Handle of the assistant message an open stream is appending to.
    streaming: Option<MessageId>,
    /// An ingest save issued without the preview workflow is in flight.
    direct_save: bool,
    preview: PreviewState,
    toast: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::project(self)
    }

    /// One-shot render flag, cleared on read.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target(&self) -> IngestTarget {
        self.target
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn preview(&self) -> &PreviewState {
        &self.preview
    }

    pub fn streaming(&self) -> Option<MessageId> {
        self.streaming
    }

    /// One-shot toast, cleared on read.
    pub fn take_toast(&mut self) -> Option<String> {
        self.toast.take()
    }

    /// Exactly one request may be in flight; the composer is a no-op while
    /// this holds.
    pub fn is_busy(&self) -> bool {
        self.streaming.is_some()
            || self.direct_save
            || matches!(
                self.preview.phase(),
                PreviewPhase::Loading | PreviewPhase::Saving
            )
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.mark_dirty();
    }

    pub(crate) fn set_target(&mut self, target: IngestTarget) {
        self.target = target;
        self.mark_dirty();
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_message_id += 1;
        self.next_message_id
    }

    pub(crate) fn push_user_message(&mut self, text: String, images: Vec<String>) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(ChatMessage::user(id, text, images));
        self.mark_dirty();
        id
    }

    /// Appends an empty assistant message and marks it as the stream target.
    pub(crate) fn begin_assistant_message(&mut self) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(ChatMessage::assistant(id, ""));
        self.streaming = Some(id);
        self.mark_dirty();
        id
    }

    /// Conversation snapshot sent with the chat request: everything before
    /// the assistant placeholder named by `id`.
    pub(crate) fn history_before(&self, id: MessageId) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .take_while(|message| message.id != id)
            .cloned()
            .collect()
    }

    fn message_mut(&mut self, id: MessageId) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|message| message.id == id)
    }

    /// Appends a content delta to the in-flight assistant message. Deltas
    /// addressed to anything other than the open stream are dropped.
    pub(crate) fn apply_stream_delta(&mut self, id: MessageId, text: &str) {
        if self.streaming != Some(id) {
            return;
        }
        if let Some(message) = self.message_mut(id) {
            message.content.push_str(text);
            self.mark_dirty();
        }
    }

    /// Protocol error frame: replaces the assistant content and closes the
    /// stream. Later deltas for this id no longer apply.
    pub(crate) fn fail_stream(&mut self, id: MessageId, error_text: String) {
        if self.streaming != Some(id) {
            return;
        }
        if let Some(message) = self.message_mut(id) {
            message.content = error_text;
        }
        self.streaming = None;
        self.mark_dirty();
    }

    /// Transport failure: overwrites the placeholder when nothing streamed
    /// yet, otherwise preserves the partial content and appends the error as
    /// its own message.
    pub(crate) fn abort_stream(&mut self, id: MessageId, error_text: String) {
        if self.streaming != Some(id) {
            return;
        }
        self.streaming = None;
        match self.message_mut(id) {
            Some(message) if message.content.is_empty() => {
                message.content = error_text;
            }
            _ => {
                let fresh = self.allocate_id();
                self.messages.push(ChatMessage::assistant(fresh, error_text));
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn finish_stream(&mut self, id: MessageId) {
        if self.streaming == Some(id) {
            self.streaming = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn append_assistant_message(&mut self, text: String) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(ChatMessage::assistant(id, text));
        self.mark_dirty();
        id
    }

    pub(crate) fn append_save_summary(&mut self, outcome: &SaveOutcome) {
        let id = self.allocate_id();
        let mut message = ChatMessage {
            id,
            role: Role::Assistant,
            content: format_save_summary(outcome),
            images: Vec::new(),
            meta: None,
        };
        message.meta = Some(MessageMeta {
            cards_created: outcome.cards_created,
            session_saved: outcome.session_saved,
            session_id: outcome.session_id.clone(),
        });
        self.messages.push(message);
        self.mark_dirty();
    }

    pub(crate) fn preview_mut(&mut self) -> &mut PreviewState {
        self.mark_dirty();
        &mut self.preview
    }

    pub(crate) fn set_direct_save(&mut self, in_flight: bool) {
        self.direct_save = in_flight;
        self.mark_dirty();
    }

    pub(crate) fn direct_save(&self) -> bool {
        self.direct_save
    }

    pub(crate) fn show_toast(&mut self, text: impl Into<String>) {
        self.toast = Some(text.into());
        self.mark_dirty();
    }
}

/// Folds the save collaborator's bookkeeping into one assistant-facing
/// message: response text, card count, session status, sync status.
fn format_save_summary(outcome: &SaveOutcome) -> String {
    let mut lines = Vec::new();
    if !outcome.response.trim().is_empty() {
        lines.push(outcome.response.trim().to_string());
    }
    if let Some(count) = outcome.cards_created {
        lines.push(format!("Cards created: {count}"));
    }
    if outcome.session_saved {
        match &outcome.session_id {
            Some(session_id) => lines.push(format!("Study session saved ({session_id})")),
            None => lines.push("Study session saved".to_string()),
        }
    }
    if let Some(error) = &outcome.obsidian_error {
        lines.push(format!("Obsidian sync failed: {error}"));
    } else if outcome.obsidian_synced == Some(true) {
        lines.push("Synced to Obsidian".to_string());
    }
    if lines.is_empty() {
        lines.push("Saved".to_string());
    }
    lines.join("\n")
}
