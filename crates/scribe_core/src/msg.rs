use crate::message::{MessageId, SaveOutcome};
use crate::preview::OrganizePreview;
use crate::state::{IngestTarget, Mode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted the composer: trimmed text plus staged image data URLs.
    ComposerSubmitted { text: String, images: Vec<String> },
    /// User switched between chat and ingest mode.
    ModeSelected(Mode),
    /// User switched the ingest target.
    TargetSelected(IngestTarget),
    /// One accepted content delta from the chat stream.
    StreamDelta { message_id: MessageId, text: String },
    /// The stream ended normally (`[DONE]` or body exhausted).
    StreamClosed { message_id: MessageId },
    /// The stream delivered a protocol-level error frame.
    StreamErrored { message_id: MessageId, message: String },
    /// The transport failed before or during the read.
    StreamFailed { message_id: MessageId, message: String },
    /// Organize collaborator returned a usable preview.
    OrganizeLoaded { preview: OrganizePreview },
    /// Organize collaborator failed or reported `success: false`.
    OrganizeFailed { message: String },
    /// User toggled one review checklist entry.
    ChecklistToggled { item: String },
    /// User picked a destination option (or the `custom` sentinel).
    DestinationSelected { id: String },
    /// User edited the free-text custom destination path.
    CustomDestinationEdited { text: String },
    /// User confirmed the destructive write.
    ConfirmClicked,
    /// User declined the preview; clears all workflow state.
    DeclineClicked,
    /// Save collaborator finished.
    SaveFinished { outcome: SaveOutcome },
    /// Save collaborator failed.
    SaveFailed { message: String },
    /// Fallback for placeholder wiring.
    NoOp,
}
