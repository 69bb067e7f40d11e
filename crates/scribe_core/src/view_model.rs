use crate::diff::DiffLine;
use crate::message::{ChatMessage, MessageId};
use crate::preview::{DestinationOption, PreviewPhase};
use crate::state::{AppState, IngestTarget, Mode};

/// Read-only projection of [`AppState`] for the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub mode: Mode,
    pub target: IngestTarget,
    pub busy: bool,
    /// Handle of the assistant message still receiving deltas, if any.
    pub streaming: Option<MessageId>,
    pub messages: Vec<ChatMessage>,
    /// Present while the preview dialog is on screen.
    pub preview: Option<PreviewView>,
    /// Error text when the organize call failed; the dialog stays closed.
    pub preview_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub title: String,
    pub markdown: String,
    pub suggested_links: Vec<String>,
    pub diff: Vec<DiffLine>,
    pub checklist: Vec<ChecklistRowView>,
    pub destinations: Vec<DestinationOption>,
    pub selected_destination_id: String,
    pub custom_destination: String,
    pub resolved_destination: String,
    pub can_confirm: bool,
    pub saving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistRowView {
    pub item: String,
    pub checked: bool,
}

impl AppViewModel {
    pub(crate) fn project(state: &AppState) -> Self {
        let preview_state = state.preview();
        let preview = preview_state.organized().filter(|_| preview_state.is_open()).map(|organized| PreviewView {
            title: organized.title.clone(),
            markdown: organized.markdown.clone(),
            suggested_links: organized.suggested_links.clone(),
            diff: preview_state.diff().to_vec(),
            checklist: preview_state
                .checklist()
                .iter()
                .map(|(item, checked)| ChecklistRowView {
                    item: item.clone(),
                    checked: *checked,
                })
                .collect(),
            destinations: preview_state.destinations().to_vec(),
            selected_destination_id: preview_state.selected_destination_id().to_string(),
            custom_destination: preview_state.custom_destination().to_string(),
            resolved_destination: preview_state.resolved_destination(),
            can_confirm: preview_state.can_confirm(),
            saving: *preview_state.phase() == PreviewPhase::Saving,
        });
        let preview_error = match preview_state.phase() {
            PreviewPhase::Error(message) => Some(message.clone()),
            _ => None,
        };
        Self {
            mode: state.mode(),
            target: state.target(),
            busy: state.is_busy(),
            streaming: state.streaming(),
            messages: state.messages().to_vec(),
            preview,
            preview_error,
        }
    }
}
