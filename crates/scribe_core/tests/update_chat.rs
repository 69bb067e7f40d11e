use std::sync::Once;

use scribe_core::{update, AppState, Effect, Mode, Msg, Role};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn submit(state: AppState, text: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::ComposerSubmitted {
            text: text.to_string(),
            images: Vec::new(),
        },
    )
}

#[test]
fn chat_submission_appends_user_and_placeholder() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = submit(state, "  hello  ");
    let view = state.view();

    assert_eq!(view.mode, Mode::Chat);
    assert_eq!(view.messages.len(), 2);
    assert_eq!(view.messages[0].role, Role::User);
    assert_eq!(view.messages[0].content, "hello");
    assert_eq!(view.messages[1].role, Role::Assistant);
    assert_eq!(view.messages[1].content, "");
    assert_eq!(view.streaming, Some(view.messages[1].id));
    assert!(view.busy);

    // The history sent with the request stops before the placeholder.
    match &effects[..] {
        [Effect::OpenChatStream {
            message_id,
            history,
        }] => {
            assert_eq!(*message_id, view.messages[1].id);
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].content, "hello");
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn deltas_accumulate_and_close_freezes_the_message() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = submit(state, "hello");
    let Effect::OpenChatStream { message_id, .. } = effects[0].clone() else {
        panic!("expected a stream effect");
    };

    let (state, _) = update(
        state,
        Msg::StreamDelta {
            message_id,
            text: "hi ".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::StreamDelta {
            message_id,
            text: "there".to_string(),
        },
    );
    let (state, _) = update(state, Msg::StreamClosed { message_id });

    let view = state.view();
    assert_eq!(view.messages[1].content, "hi there");
    assert_eq!(view.streaming, None);
    assert!(!view.busy);

    // A straggler delta after the close never applies.
    let (state, _) = update(
        state,
        Msg::StreamDelta {
            message_id,
            text: "!!".to_string(),
        },
    );
    assert_eq!(state.view().messages[1].content, "hi there");
}

#[test]
fn error_frame_replaces_content_and_stops_the_stream() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = submit(state, "hello");
    let Effect::OpenChatStream { message_id, .. } = effects[0].clone() else {
        panic!("expected a stream effect");
    };

    let (state, _) = update(
        state,
        Msg::StreamDelta {
            message_id,
            text: "partial".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::StreamErrored {
            message_id,
            message: "model unavailable".to_string(),
        },
    );

    let view = state.view();
    assert_eq!(view.messages[1].content, "Error: model unavailable");
    assert_eq!(view.streaming, None);

    let (state, _) = update(
        state,
        Msg::StreamDelta {
            message_id,
            text: "late".to_string(),
        },
    );
    assert_eq!(state.view().messages[1].content, "Error: model unavailable");
}

#[test]
fn transport_failure_overwrites_an_empty_placeholder() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = submit(state, "hello");
    let Effect::OpenChatStream { message_id, .. } = effects[0].clone() else {
        panic!("expected a stream effect");
    };

    let (state, _) = update(
        state,
        Msg::StreamFailed {
            message_id,
            message: "connection refused".to_string(),
        },
    );

    let view = state.view();
    assert_eq!(view.messages.len(), 2);
    assert_eq!(view.messages[1].content, "Error: connection refused");
}

#[test]
fn transport_failure_mid_stream_keeps_partial_content() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = submit(state, "hello");
    let Effect::OpenChatStream { message_id, .. } = effects[0].clone() else {
        panic!("expected a stream effect");
    };

    let (state, _) = update(
        state,
        Msg::StreamDelta {
            message_id,
            text: "partial answer".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::StreamFailed {
            message_id,
            message: "reset by peer".to_string(),
        },
    );

    let view = state.view();
    assert_eq!(view.messages.len(), 3);
    assert_eq!(view.messages[1].content, "partial answer");
    assert_eq!(view.messages[2].content, "Error: reset by peer");
}

#[test]
fn submissions_are_blocked_while_a_stream_is_open() {
    init_logging();
    let state = AppState::new();
    let (state, _) = submit(state, "first");
    let before = state.view().messages.len();

    let (state, effects) = submit(state, "second");
    assert_eq!(state.view().messages.len(), before);
    assert!(effects.is_empty());
}

#[test]
fn image_only_submission_is_accepted() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(
        state,
        Msg::ComposerSubmitted {
            text: String::new(),
            images: vec!["data:image/png;base64,AAAA".to_string()],
        },
    );

    assert_eq!(state.view().messages[0].images.len(), 1);
    assert_eq!(effects.len(), 1);
}
