//! Line-oriented shell around the core state machine and the engine.
//!
//! The shell owns no business logic: input lines become messages, effects go
//! to the engine, engine events come back as messages, and rendering is
//! gated on the state's dirty flag.
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use scribe_core::{
    update, AppState, AppViewModel, ChatMessage, DestinationOption, Effect, IngestTarget,
    MessageId, Mode, Msg, OrganizePreview, OrganizedNote, PreviewView, Role, SaveOutcome,
    CUSTOM_DESTINATION_ID,
};
use scribe_engine::{
    mime_for_path, BackendSettings, EngineEvent, EngineHandle, HistoryEntry, ImageTray,
    OrganizePayload, SaveResponse, StreamEnd,
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(settings: BackendSettings) -> anyhow::Result<()> {
    let engine = EngineHandle::new(settings)?;
    let (line_tx, line_rx) = mpsc::channel::<String>();

    // Blocking stdin reads happen off the main loop.
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut shell = Shell::new(engine);
    shell.greet();

    loop {
        let mut worked = false;
        while let Some(event) = shell.engine.try_recv() {
            shell.dispatch(event_to_msg(event));
            worked = true;
        }
        match line_rx.try_recv() {
            Ok(line) => {
                if !shell.handle_line(line.trim()) {
                    break;
                }
                worked = true;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => break,
        }
        shell.render();
        if !worked {
            thread::sleep(POLL_INTERVAL);
        }
    }
    Ok(())
}

struct Shell {
    state: AppState,
    engine: EngineHandle,
    tray: ImageTray,
    printer: TranscriptPrinter,
    last_preview: Option<PreviewView>,
}

impl Shell {
    fn new(engine: EngineHandle) -> Self {
        Self {
            state: AppState::new(),
            engine,
            tray: ImageTray::new(),
            printer: TranscriptPrinter::default(),
            last_preview: None,
        }
    }

    fn greet(&self) {
        println!("scribe - study note ingestion");
        println!("type to chat; /help lists commands");
    }

    fn print_help(&self) {
        println!("/mode chat|ingest      switch pipeline mode");
        println!("/target anki|obsidian|both");
        println!("/attach <path>         stage an image for the next message");
        println!("/unattach <n>          drop staged image n");
        println!("/images                list staged images");
        println!("/check <n|item>        toggle a review checklist entry");
        println!("/dest <id>             pick a destination option");
        println!("/dest custom <path>    use a custom vault path");
        println!("/confirm               write the organized note");
        println!("/decline               discard the preview");
        println!("/quit");
    }

    /// Returns false when the shell should exit.
    fn handle_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }
        if let Some(rest) = line.strip_prefix('/') {
            let mut parts = rest.splitn(2, ' ');
            let command = parts.next().unwrap_or("");
            let argument = parts.next().unwrap_or("").trim();
            match command {
                "quit" | "exit" => return false,
                "help" => self.print_help(),
                "mode" => match argument {
                    "chat" => self.dispatch(Msg::ModeSelected(Mode::Chat)),
                    "ingest" => self.dispatch(Msg::ModeSelected(Mode::Ingest)),
                    _ => println!("! unknown mode: {argument}"),
                },
                "target" => match argument {
                    "anki" => self.dispatch(Msg::TargetSelected(IngestTarget::Anki)),
                    "obsidian" => self.dispatch(Msg::TargetSelected(IngestTarget::Obsidian)),
                    "both" | "all" => self.dispatch(Msg::TargetSelected(IngestTarget::Both)),
                    _ => println!("! unknown target: {argument}"),
                },
                "attach" => self.attach(argument),
                "unattach" => self.unattach(argument),
                "images" => self.list_images(),
                "check" => self.check(argument),
                "dest" => self.dest(argument),
                "confirm" => self.dispatch(Msg::ConfirmClicked),
                "decline" => self.dispatch(Msg::DeclineClicked),
                _ => println!("! unknown command: /{command}"),
            }
            return true;
        }
        if self.state.is_busy() {
            println!("! a request is already in flight");
            return true;
        }
        if self.state.preview().is_open() {
            println!("! finish or /decline the open preview first");
            return true;
        }
        let images = self.tray.drain();
        self.dispatch(Msg::ComposerSubmitted {
            text: line.to_string(),
            images,
        });
        true
    }

    fn attach(&mut self, path: &str) {
        if path.is_empty() {
            println!("! usage: /attach <path>");
            return;
        }
        let Some(mime) = mime_for_path(path) else {
            println!("! not an image file: {path}");
            return;
        };
        match std::fs::read(path) {
            Ok(bytes) => {
                let name = path.rsplit(['/', '\\']).next().unwrap_or(path).to_string();
                self.tray.accept(&name, mime, &bytes);
                println!("staged {name} ({} pending)", self.tray.pending().len());
            }
            Err(err) => println!("! could not read {path}: {err}"),
        }
    }

    fn unattach(&mut self, argument: &str) {
        match argument.parse::<usize>() {
            Ok(index) if index >= 1 => match self.tray.remove(index - 1) {
                Some(image) => println!("dropped {}", image.name),
                None => println!("! no staged image {index}"),
            },
            _ => println!("! usage: /unattach <n>"),
        }
    }

    fn list_images(&self) {
        if self.tray.pending().is_empty() {
            println!("no staged images");
            return;
        }
        for (index, image) in self.tray.pending().iter().enumerate() {
            println!("  {}. {} ({})", index + 1, image.name, image.mime);
        }
    }

    fn check(&mut self, argument: &str) {
        let view = self.state.view();
        let Some(preview) = view.preview else {
            println!("! no preview open");
            return;
        };
        let item = match argument.parse::<usize>() {
            Ok(index) if index >= 1 => preview.checklist.get(index - 1).map(|row| row.item.clone()),
            _ => Some(argument.to_string()),
        };
        match item {
            Some(item) => self.dispatch(Msg::ChecklistToggled { item }),
            None => println!("! no checklist entry {argument}"),
        }
    }

    fn dest(&mut self, argument: &str) {
        if argument.is_empty() {
            println!("! usage: /dest <id> | /dest custom <path>");
            return;
        }
        if let Some(path) = argument.strip_prefix("custom ") {
            self.dispatch(Msg::DestinationSelected {
                id: CUSTOM_DESTINATION_ID.to_string(),
            });
            self.dispatch(Msg::CustomDestinationEdited {
                text: path.to_string(),
            });
        } else {
            self.dispatch(Msg::DestinationSelected {
                id: argument.to_string(),
            });
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::OpenChatStream {
                message_id,
                history,
            } => {
                let history = history.iter().map(history_entry).collect();
                self.engine.open_chat_stream(message_id, history);
            }
            Effect::RequestOrganize { raw_notes } => self.engine.organize(raw_notes),
            Effect::RequestSave { request } => self.engine.save(wire_save_request(request)),
        }
    }

    fn render(&mut self) {
        if !self.state.consume_dirty() {
            return;
        }
        if let Some(toast) = self.state.take_toast() {
            println!("! {toast}");
        }
        let view = self.state.view();
        self.printer.sync(&view);
        self.render_preview(&view);
    }

    fn render_preview(&mut self, view: &AppViewModel) {
        if self.last_preview == view.preview {
            return;
        }
        let newly_opened = self.last_preview.is_none();
        if let Some(preview) = &view.preview {
            if newly_opened {
                println!("--- preview: {} ---", preview.title);
                for line in &preview.diff {
                    println!("{}{}", line.marker(), line.text());
                }
                if !preview.suggested_links.is_empty() {
                    println!("links: {}", preview.suggested_links.join(", "));
                }
            }
            if !preview.checklist.is_empty() {
                println!("checklist:");
                for (index, row) in preview.checklist.iter().enumerate() {
                    let mark = if row.checked { "x" } else { " " };
                    println!("  [{mark}] {}. {}", index + 1, row.item);
                }
            }
            println!("destinations:");
            for option in &preview.destinations {
                let selected = if option.id == preview.selected_destination_id {
                    ">"
                } else {
                    " "
                };
                let exists = if option.exists { "" } else { " (new)" };
                println!("  {selected} {}: {}{exists}", option.id, option.path);
            }
            if preview.selected_destination_id == CUSTOM_DESTINATION_ID {
                println!("  > custom: {}", preview.custom_destination);
            }
            if preview.saving {
                println!("saving...");
            } else if preview.can_confirm {
                println!("ready: /confirm writes to {}", preview.resolved_destination);
            } else {
                println!("complete the checklist and pick a destination, then /confirm");
            }
        }
        self.last_preview = view.preview.clone();
    }
}

/// Incremental transcript printer: assistant deltas appear as they stream.
#[derive(Default)]
struct TranscriptPrinter {
    printed: HashMap<MessageId, usize>,
    open_line: Option<MessageId>,
}

impl TranscriptPrinter {
    fn sync(&mut self, view: &AppViewModel) {
        for message in &view.messages {
            match message.role {
                Role::User => {
                    // Typed by the user; nothing to echo.
                    self.printed.entry(message.id).or_insert(message.content.len());
                }
                Role::Assistant => {
                    self.sync_assistant(message, view.streaming == Some(message.id));
                }
            }
        }
    }

    fn sync_assistant(&mut self, message: &ChatMessage, streaming: bool) {
        let previous = self.printed.get(&message.id).copied();
        let is_open = self.open_line == Some(message.id);
        match previous {
            None => {
                self.close_open_line();
                print!("scribe> {}", message.content);
            }
            Some(prev) if is_open => {
                if message.content.len() < prev {
                    // Content was replaced (error overwrite); restart the line.
                    println!();
                    print!("scribe> {}", message.content);
                } else {
                    print!("{}", &message.content[prev..]);
                }
            }
            Some(_) => return,
        }
        self.printed.insert(message.id, message.content.len());
        if streaming {
            self.open_line = Some(message.id);
            let _ = io::stdout().flush();
        } else {
            println!();
            self.open_line = None;
        }
    }

    fn close_open_line(&mut self) {
        if self.open_line.take().is_some() {
            println!();
        }
    }
}

fn history_entry(message: &ChatMessage) -> HistoryEntry {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    HistoryEntry {
        role: role.to_string(),
        content: message.content.clone(),
        images: message.images.clone(),
    }
}

fn wire_save_request(request: scribe_core::SaveRequest) -> scribe_engine::SaveRequest {
    scribe_engine::SaveRequest {
        message: request.message,
        sync_to_obsidian: request.sync_to_obsidian,
        mode: request.target.wire_name().to_string(),
        destination_path: request.destination_path,
        organized_markdown: request.organized_markdown,
        organized_title: request.organized_title,
        confirm_write: request.confirm_write,
    }
}

fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ChatDelta { message_id, text } => Msg::StreamDelta { message_id, text },
        EngineEvent::ChatStreamEnded { message_id, end } => match end {
            StreamEnd::Completed => Msg::StreamClosed { message_id },
            StreamEnd::Errored(message) => Msg::StreamErrored {
                message_id,
                message,
            },
        },
        EngineEvent::ChatStreamFailed { message_id, error } => Msg::StreamFailed {
            message_id,
            message: error.to_string(),
        },
        EngineEvent::OrganizeFinished { result } => match result {
            Ok(payload) => Msg::OrganizeLoaded {
                preview: organize_preview(payload),
            },
            Err(error) => Msg::OrganizeFailed {
                message: error.to_string(),
            },
        },
        EngineEvent::SaveFinished { result } => match result {
            Ok(response) => Msg::SaveFinished {
                outcome: save_outcome(response),
            },
            Err(error) => Msg::SaveFailed {
                message: error.to_string(),
            },
        },
    }
}

fn organize_preview(payload: OrganizePayload) -> OrganizePreview {
    OrganizePreview {
        organized: OrganizedNote {
            title: payload.organized.title,
            markdown: payload.organized.markdown,
            checklist: payload.organized.checklist,
            suggested_links: payload.organized.suggested_links,
        },
        destinations: payload
            .options
            .into_iter()
            .map(|option| DestinationOption {
                id: option.id,
                label: option.label,
                path: option.path,
                exists: option.exists,
            })
            .collect(),
    }
}

fn save_outcome(response: SaveResponse) -> SaveOutcome {
    SaveOutcome {
        response: response.response,
        cards_created: response.cards_created,
        session_saved: response.session_saved.unwrap_or(false),
        session_id: response.session_id,
        obsidian_synced: response.obsidian_synced,
        obsidian_error: response.obsidian_error,
    }
}
