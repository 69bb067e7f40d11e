use std::sync::Once;

use scribe_core::{update, AppState, Effect, IngestTarget, Mode, Msg, SaveOutcome};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn ingest_state(target: IngestTarget) -> AppState {
    let state = AppState::new();
    let (state, _) = update(state, Msg::ModeSelected(Mode::Ingest));
    let (state, _) = update(state, Msg::TargetSelected(target));
    state
}

#[test]
fn anki_target_saves_directly_without_organize() {
    init_logging();
    let state = ingest_state(IngestTarget::Anki);
    let (state, effects) = update(
        state,
        Msg::ComposerSubmitted {
            text: "quiz me on mitosis".to_string(),
            images: Vec::new(),
        },
    );

    // No organize step, no preview dialog: the raw text goes straight to
    // the save collaborator.
    match &effects[..] {
        [Effect::RequestSave { request }] => {
            assert_eq!(request.message, "quiz me on mitosis");
            assert!(!request.sync_to_obsidian);
            assert_eq!(request.target, IngestTarget::Anki);
            assert_eq!(request.destination_path, None);
            assert_eq!(request.organized_markdown, None);
            assert_eq!(request.confirm_write, None);
        }
        other => panic!("unexpected effects: {other:?}"),
    }
    let view = state.view();
    assert!(view.preview.is_none());
    assert!(view.busy);
}

#[test]
fn direct_save_success_appends_the_summary() {
    init_logging();
    let state = ingest_state(IngestTarget::Anki);
    let (state, _) = update(
        state,
        Msg::ComposerSubmitted {
            text: "facts".to_string(),
            images: Vec::new(),
        },
    );
    let (state, _) = update(
        state,
        Msg::SaveFinished {
            outcome: SaveOutcome {
                response: "Created 4 cards.".to_string(),
                cards_created: Some(4),
                session_saved: true,
                session_id: Some("sess-7".to_string()),
                obsidian_synced: None,
                obsidian_error: None,
            },
        },
    );

    let view = state.view();
    assert!(!view.busy);
    let summary = view.messages.last().unwrap();
    assert!(summary.content.contains("Created 4 cards."));
    assert!(summary.content.contains("Study session saved (sess-7)"));
    assert_eq!(summary.meta.as_ref().unwrap().cards_created, Some(4));
}

#[test]
fn direct_save_failure_becomes_a_visible_error() {
    init_logging();
    let state = ingest_state(IngestTarget::Anki);
    let (state, _) = update(
        state,
        Msg::ComposerSubmitted {
            text: "facts".to_string(),
            images: Vec::new(),
        },
    );
    let (state, _) = update(
        state,
        Msg::SaveFailed {
            message: "anki is not running".to_string(),
        },
    );

    let view = state.view();
    assert!(!view.busy);
    assert_eq!(
        view.messages.last().unwrap().content,
        "Error: anki is not running"
    );
}

#[test]
fn both_target_routes_through_the_preview_workflow() {
    init_logging();
    let state = ingest_state(IngestTarget::Both);
    let (state, effects) = update(
        state,
        Msg::ComposerSubmitted {
            text: "notes".to_string(),
            images: Vec::new(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::RequestOrganize {
            raw_notes: "notes".to_string(),
        }]
    );
    assert!(state.view().busy);
}

#[test]
fn chat_mode_ignores_the_ingest_target() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::TargetSelected(IngestTarget::Anki));
    let (_, effects) = update(
        state,
        Msg::ComposerSubmitted {
            text: "hello".to_string(),
            images: Vec::new(),
        },
    );
    assert!(matches!(&effects[..], [Effect::OpenChatStream { .. }]));
}
