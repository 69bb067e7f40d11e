//! Scribe core: pure state machine for the chat-ingestion pipeline.
mod diff;
mod effect;
mod message;
mod msg;
mod preview;
mod state;
mod update;
mod view_model;

pub use diff::{diff_lines, DiffLine};
pub use effect::{Effect, SaveRequest};
pub use message::{ChatMessage, MessageId, MessageMeta, Role, SaveOutcome};
pub use msg::Msg;
pub use preview::{
    DestinationOption, OrganizePreview, OrganizedNote, PreviewPhase, PreviewState,
    CUSTOM_DESTINATION_ID, RECOMMENDED_DESTINATION_ID,
};
pub use state::{AppState, IngestTarget, Mode};
pub use update::update;
pub use view_model::{AppViewModel, ChecklistRowView, PreviewView};
