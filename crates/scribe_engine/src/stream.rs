use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};

use crate::frame::{parse_frame, Frame};
use crate::http::{build_client, map_reqwest_error, BackendSettings};
use crate::types::TransportError;
use crate::wire::ChatRequest;

/// Raw chunked response body; chunk boundaries carry no meaning.
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Transport boundary for the chat completion endpoint.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    async fn open(&self, request: &ChatRequest) -> Result<ByteStream, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestChatTransport {
    client: reqwest::Client,
    url: String,
}

impl ReqwestChatTransport {
    pub fn new(settings: &BackendSettings) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(settings, false)?,
            url: settings.endpoint(&settings.chat_path),
        })
    }
}

#[async_trait::async_trait]
impl ChatTransport for ReqwestChatTransport {
    async fn open(&self, request: &ChatRequest) -> Result<ByteStream, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }
        Ok(response.bytes_stream().map_err(map_reqwest_error).boxed())
    }
}

/// Receives accepted content deltas as they are decoded.
pub trait DeltaSink: Send + Sync {
    fn delta(&self, text: &str);
}

/// How the stream finished, transport errors aside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
    /// `[DONE]` marker seen, or the body closed cleanly.
    Completed,
    /// An error frame terminated processing; later frames were never read.
    Errored(String),
}

/// Reads the chunked body and dispatches frames to the sink.
///
/// Frames are newline-delimited but chunk boundaries fall anywhere, so bytes
/// accumulate in a buffer and only complete, newline-terminated lines are
/// decoded; the trailing partial line is retained as the new buffer. A frame
/// split across two reads is therefore parsed exactly once, intact.
pub async fn read_chat_stream(
    mut stream: ByteStream,
    sink: &dyn DeltaSink,
) -> Result<StreamEnd, TransportError> {
    let mut buffer: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        buffer.extend_from_slice(&chunk);
        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            match parse_frame(line.trim_end_matches(['\n', '\r'])) {
                Some(Frame::Done) => return Ok(StreamEnd::Completed),
                Some(Frame::Error(message)) => return Ok(StreamEnd::Errored(message)),
                Some(Frame::Content(text)) => sink.delta(&text),
                None => {
                    engine_logging::engine_debug!("skipping unrecognized stream line");
                }
            }
        }
    }
    // Body exhausted without a [DONE] marker; an unterminated trailing line
    // is dropped, matching the complete-lines-only rule.
    Ok(StreamEnd::Completed)
}
