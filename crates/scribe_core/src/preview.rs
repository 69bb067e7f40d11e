use crate::diff::{diff_lines, DiffLine};
use crate::state::IngestTarget;

/// Default destination selection seeded when a preview opens.
pub const RECOMMENDED_DESTINATION_ID: &str = "recommended";
/// Sentinel id meaning "use the free-text custom path".
pub const CUSTOM_DESTINATION_ID: &str = "custom";

/// Structured document produced by the organize collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizedNote {
    pub title: String,
    pub markdown: String,
    pub checklist: Vec<String>,
    pub suggested_links: Vec<String>,
}

/// One candidate vault path offered by the organize collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationOption {
    pub id: String,
    pub label: String,
    pub path: String,
    pub exists: bool,
}

/// Successful organize response: the document plus candidate destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizePreview {
    pub organized: OrganizedNote,
    pub destinations: Vec<DestinationOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewPhase {
    #[default]
    Idle,
    Loading,
    Previewing,
    Saving,
    Error(String),
}

/// State of the organize -> preview -> confirm -> save workflow.
///
/// Everything here is discarded by [`PreviewState::reset`]; a failed save
/// deliberately leaves the fields untouched so the user can retry without
/// re-running the organize call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewState {
    phase: PreviewPhase,
    raw_notes: String,
    target: IngestTarget,
    organized: Option<OrganizedNote>,
    destinations: Vec<DestinationOption>,
    checklist: Vec<(String, bool)>,
    diff: Vec<DiffLine>,
    selected_destination_id: String,
    custom_destination: String,
}

impl PreviewState {
    pub fn phase(&self) -> &PreviewPhase {
        &self.phase
    }

    pub fn raw_notes(&self) -> &str {
        &self.raw_notes
    }

    pub fn target(&self) -> IngestTarget {
        self.target
    }

    pub fn organized(&self) -> Option<&OrganizedNote> {
        self.organized.as_ref()
    }

    pub fn destinations(&self) -> &[DestinationOption] {
        &self.destinations
    }

    pub fn checklist(&self) -> &[(String, bool)] {
        &self.checklist
    }

    pub fn diff(&self) -> &[DiffLine] {
        &self.diff
    }

    pub fn selected_destination_id(&self) -> &str {
        &self.selected_destination_id
    }

    pub fn custom_destination(&self) -> &str {
        &self.custom_destination
    }

    /// Dialog is visible while a loaded preview is on screen or saving.
    pub fn is_open(&self) -> bool {
        matches!(self.phase, PreviewPhase::Previewing | PreviewPhase::Saving)
    }

    pub(crate) fn begin_loading(&mut self, raw_notes: String, target: IngestTarget) {
        self.reset();
        self.phase = PreviewPhase::Loading;
        self.raw_notes = raw_notes;
        self.target = target;
    }

    pub(crate) fn loaded(&mut self, preview: OrganizePreview) {
        self.diff = diff_lines(&self.raw_notes, &preview.organized.markdown);
        self.checklist = preview
            .organized
            .checklist
            .iter()
            .map(|item| (item.clone(), false))
            .collect();
        self.destinations = preview.destinations;
        self.organized = Some(preview.organized);
        self.selected_destination_id = RECOMMENDED_DESTINATION_ID.to_string();
        self.custom_destination.clear();
        self.phase = PreviewPhase::Previewing;
    }

    pub(crate) fn load_failed(&mut self, message: String) {
        self.reset();
        self.phase = PreviewPhase::Error(message);
    }

    /// Flips exactly one checklist entry. Returns false for unknown items.
    pub(crate) fn toggle_checklist(&mut self, item: &str) -> bool {
        match self.checklist.iter_mut().find(|(text, _)| text == item) {
            Some(entry) => {
                entry.1 = !entry.1;
                true
            }
            None => false,
        }
    }

    pub(crate) fn select_destination(&mut self, id: String) {
        self.selected_destination_id = id;
    }

    pub(crate) fn edit_custom_destination(&mut self, text: String) {
        self.custom_destination = text;
    }

    /// Save is gated on every checklist entry being acknowledged.
    /// Vacuously true when the organize call produced no checklist.
    pub fn checklist_complete(&self) -> bool {
        self.checklist.iter().all(|(_, checked)| *checked)
    }

    /// Single source of truth for the destination path: the trimmed custom
    /// text when `custom` is selected, the matching option's path otherwise,
    /// and empty when nothing matches.
    pub fn resolved_destination(&self) -> String {
        if self.selected_destination_id == CUSTOM_DESTINATION_ID {
            return self.custom_destination.trim().to_string();
        }
        self.destinations
            .iter()
            .find(|option| option.id == self.selected_destination_id)
            .map(|option| option.path.clone())
            .unwrap_or_default()
    }

    pub fn can_confirm(&self) -> bool {
        self.phase == PreviewPhase::Previewing
            && self.checklist_complete()
            && !self.resolved_destination().is_empty()
    }

    pub(crate) fn begin_saving(&mut self) {
        self.phase = PreviewPhase::Saving;
    }

    pub(crate) fn save_failed(&mut self) {
        self.phase = PreviewPhase::Previewing;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
