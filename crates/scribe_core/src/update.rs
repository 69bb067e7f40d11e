use crate::effect::{Effect, SaveRequest};
use crate::msg::Msg;
use crate::preview::PreviewPhase;
use crate::state::{AppState, IngestTarget, Mode};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ComposerSubmitted { text, images } => {
            let text = text.trim().to_string();
            if text.is_empty() && images.is_empty() {
                return (state, Vec::new());
            }
            // A new submission is blocked while any request is in flight, so
            // only one continuation ever mutates the history at a time. An
            // open preview dialog also blocks: startPreview is only legal
            // from idle or error.
            if state.is_busy() || state.preview().is_open() {
                return (state, Vec::new());
            }
            state.push_user_message(text.clone(), images);
            match state.mode() {
                Mode::Chat => {
                    let message_id = state.begin_assistant_message();
                    let history = state.history_before(message_id);
                    vec![Effect::OpenChatStream {
                        message_id,
                        history,
                    }]
                }
                Mode::Ingest => dispatch_ingest(&mut state, text),
            }
        }
        Msg::ModeSelected(mode) => {
            state.set_mode(mode);
            Vec::new()
        }
        Msg::TargetSelected(target) => {
            state.set_target(target);
            Vec::new()
        }
        Msg::StreamDelta { message_id, text } => {
            state.apply_stream_delta(message_id, &text);
            Vec::new()
        }
        Msg::StreamClosed { message_id } => {
            state.finish_stream(message_id);
            Vec::new()
        }
        Msg::StreamErrored {
            message_id,
            message,
        } => {
            state.fail_stream(message_id, format!("Error: {message}"));
            Vec::new()
        }
        Msg::StreamFailed {
            message_id,
            message,
        } => {
            state.abort_stream(message_id, format!("Error: {message}"));
            Vec::new()
        }
        Msg::OrganizeLoaded { preview } => {
            if *state.preview().phase() == PreviewPhase::Loading {
                state.preview_mut().loaded(preview);
            }
            Vec::new()
        }
        Msg::OrganizeFailed { message } => {
            if *state.preview().phase() == PreviewPhase::Loading {
                state.preview_mut().load_failed(message.clone());
                state.append_assistant_message(format!("Error: {message}"));
            }
            Vec::new()
        }
        Msg::ChecklistToggled { item } => {
            if *state.preview().phase() == PreviewPhase::Previewing {
                state.preview_mut().toggle_checklist(&item);
            }
            Vec::new()
        }
        Msg::DestinationSelected { id } => {
            if *state.preview().phase() == PreviewPhase::Previewing {
                state.preview_mut().select_destination(id);
            }
            Vec::new()
        }
        Msg::CustomDestinationEdited { text } => {
            if *state.preview().phase() == PreviewPhase::Previewing {
                state.preview_mut().edit_custom_destination(text);
            }
            Vec::new()
        }
        Msg::ConfirmClicked => confirm(&mut state),
        Msg::DeclineClicked => {
            state.preview_mut().reset();
            Vec::new()
        }
        Msg::SaveFinished { outcome } => {
            if *state.preview().phase() == PreviewPhase::Saving {
                state.preview_mut().reset();
                state.append_save_summary(&outcome);
            } else if state.direct_save() {
                state.set_direct_save(false);
                state.append_save_summary(&outcome);
            }
            Vec::new()
        }
        Msg::SaveFailed { message } => {
            if *state.preview().phase() == PreviewPhase::Saving {
                // Keep the loaded preview so the user can adjust the
                // destination or checklist and retry without re-organizing.
                state.preview_mut().save_failed();
                state.show_toast(message);
            } else if state.direct_save() {
                state.set_direct_save(false);
                state.append_assistant_message(format!("Error: {message}"));
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn dispatch_ingest(state: &mut AppState, text: String) -> Vec<Effect> {
    let target = state.target();
    match target {
        // Anki-only skips the preview workflow entirely: raw text goes
        // straight to the save collaborator.
        IngestTarget::Anki => {
            state.set_direct_save(true);
            vec![Effect::RequestSave {
                request: SaveRequest {
                    message: text,
                    sync_to_obsidian: false,
                    target,
                    destination_path: None,
                    organized_markdown: None,
                    organized_title: None,
                    confirm_write: None,
                },
            }]
        }
        IngestTarget::Obsidian | IngestTarget::Both => {
            state.preview_mut().begin_loading(text.clone(), target);
            vec![Effect::RequestOrganize { raw_notes: text }]
        }
    }
}

fn confirm(state: &mut AppState) -> Vec<Effect> {
    // The confirm affordance is disabled whenever this fails; a bypassed
    // invocation must stay a no-op and surface a toast instead.
    if !state.preview().can_confirm() {
        state.show_toast("Complete the checklist and choose a destination first");
        return Vec::new();
    }
    let preview = state.preview();
    let Some(organized) = preview.organized() else {
        return Vec::new();
    };
    let request = SaveRequest {
        message: preview.raw_notes().to_string(),
        sync_to_obsidian: preview.target().syncs_to_obsidian(),
        target: preview.target(),
        destination_path: Some(preview.resolved_destination()),
        organized_markdown: Some(organized.markdown.clone()),
        organized_title: Some(organized.title.clone()),
        confirm_write: Some(true),
    };
    state.preview_mut().begin_saving();
    vec![Effect::RequestSave { request }]
}
