//! Scribe engine: streaming chat consumer, backend collaborators and effect
//! execution.
mod engine;
mod frame;
mod http;
mod image;
mod organize;
mod save;
mod stream;
mod types;
mod wire;

pub use engine::EngineHandle;
pub use frame::{parse_frame, Frame, DATA_PREFIX, DONE_MARKER};
pub use http::BackendSettings;
pub use image::{mime_for_path, ImageTray, PendingImage};
pub use organize::{OrganizeClient, ReqwestOrganizeClient};
pub use save::{ReqwestSaveClient, SaveClient};
pub use stream::{
    read_chat_stream, ByteStream, ChatTransport, DeltaSink, ReqwestChatTransport, StreamEnd,
};
pub use types::{EngineEvent, HistoryEntry, MessageId, TransportError, WorkflowError};
pub use wire::{
    ChatRequest, ContentPart, DestinationBlock, DestinationOptionDto, ImageUrl, OrganizePayload,
    OrganizeRequest, OrganizeResponse, OrganizedDoc, SaveRequest, SaveResponse, WireContent,
    WireMessage,
};
