use std::sync::{mpsc, Arc};
use std::thread;

use crate::http::BackendSettings;
use crate::organize::{OrganizeClient, ReqwestOrganizeClient};
use crate::save::{ReqwestSaveClient, SaveClient};
use crate::stream::{read_chat_stream, ChatTransport, DeltaSink, ReqwestChatTransport, StreamEnd};
use crate::types::{EngineEvent, HistoryEntry, MessageId, TransportError};
use crate::wire::{ChatRequest, SaveRequest};

enum EngineCommand {
    OpenChatStream {
        message_id: MessageId,
        history: Vec<HistoryEntry>,
    },
    Organize {
        raw_notes: String,
    },
    Save {
        request: SaveRequest,
    },
}

/// Bridge between the synchronous shell and the async collaborators: commands
/// in, events out, with a tokio runtime on a dedicated thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> Result<Self, TransportError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let transport = Arc::new(ReqwestChatTransport::new(&settings)?);
        let organize = Arc::new(ReqwestOrganizeClient::new(&settings)?);
        let save = Arc::new(ReqwestSaveClient::new(&settings)?);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let transport = transport.clone();
                let organize = organize.clone();
                let save = save.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(
                        transport.as_ref(),
                        organize.as_ref(),
                        save.as_ref(),
                        command,
                        event_tx,
                    )
                    .await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn open_chat_stream(&self, message_id: MessageId, history: Vec<HistoryEntry>) {
        let _ = self.cmd_tx.send(EngineCommand::OpenChatStream {
            message_id,
            history,
        });
    }

    pub fn organize(&self, raw_notes: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Organize {
            raw_notes: raw_notes.into(),
        });
    }

    pub fn save(&self, request: SaveRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Save { request });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

struct ChannelDeltaSink {
    tx: mpsc::Sender<EngineEvent>,
    message_id: MessageId,
}

impl DeltaSink for ChannelDeltaSink {
    fn delta(&self, text: &str) {
        let _ = self.tx.send(EngineEvent::ChatDelta {
            message_id: self.message_id,
            text: text.to_string(),
        });
    }
}

async fn handle_command(
    transport: &dyn ChatTransport,
    organize: &dyn OrganizeClient,
    save: &dyn SaveClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::OpenChatStream {
            message_id,
            history,
        } => {
            let request = ChatRequest::from_history(&history);
            let event = match transport.open(&request).await {
                Err(error) => {
                    engine_logging::engine_warn!("chat stream failed to open: {error}");
                    EngineEvent::ChatStreamFailed { message_id, error }
                }
                Ok(stream) => {
                    let sink = ChannelDeltaSink {
                        tx: event_tx.clone(),
                        message_id,
                    };
                    match read_chat_stream(stream, &sink).await {
                        Ok(end) => {
                            if let StreamEnd::Errored(message) = &end {
                                engine_logging::engine_warn!("chat stream errored: {message}");
                            }
                            EngineEvent::ChatStreamEnded { message_id, end }
                        }
                        Err(error) => {
                            engine_logging::engine_warn!("chat stream read failed: {error}");
                            EngineEvent::ChatStreamFailed { message_id, error }
                        }
                    }
                }
            };
            let _ = event_tx.send(event);
        }
        EngineCommand::Organize { raw_notes } => {
            let result = organize.organize(&raw_notes).await;
            if let Err(error) = &result {
                engine_logging::engine_warn!("organize failed: {error}");
            }
            let _ = event_tx.send(EngineEvent::OrganizeFinished { result });
        }
        EngineCommand::Save { request } => {
            let result = save.save(&request).await;
            if let Err(error) = &result {
                engine_logging::engine_warn!("save failed: {error}");
            }
            let _ = event_tx.send(EngineEvent::SaveFinished { result });
        }
    }
}
