use serde::Deserialize;

/// Literal tag prefixing every frame of interest.
pub const DATA_PREFIX: &str = "data: ";
/// Literal payload marking a successful end of stream.
pub const DONE_MARKER: &str = "[DONE]";

/// One decoded frame of the chat stream protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Content delta to append to the in-flight assistant message.
    Content(String),
    /// Terminal server-side error; no further frames apply.
    Error(String),
    /// End-of-stream marker.
    Done,
}

#[derive(Debug, Deserialize)]
struct FramePayload {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Decodes one newline-delimited line of the stream.
///
/// Returns `None` for every line that is not a well-formed frame of interest:
/// lines without the `data: ` tag, payloads that fail to parse as JSON, and
/// JSON objects carrying neither `content` nor `error`. Callers skip those
/// lines and keep reading; a malformed frame must never abort the stream.
pub fn parse_frame(line: &str) -> Option<Frame> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload == DONE_MARKER {
        return Some(Frame::Done);
    }
    let payload: FramePayload = serde_json::from_str(payload).ok()?;
    // An error field is terminal even if content rides along with it.
    if let Some(error) = payload.error {
        return Some(Frame::Error(error));
    }
    payload.content.map(Frame::Content)
}

#[cfg(test)]
mod tests {
    use super::{parse_frame, Frame};

    #[test]
    fn content_frame_parses() {
        assert_eq!(
            parse_frame(r#"data: {"content":"hi "}"#),
            Some(Frame::Content("hi ".to_string()))
        );
    }

    #[test]
    fn done_marker_parses() {
        assert_eq!(parse_frame("data: [DONE]"), Some(Frame::Done));
    }

    #[test]
    fn error_takes_precedence_over_content() {
        assert_eq!(
            parse_frame(r#"data: {"content":"x","error":"boom"}"#),
            Some(Frame::Error("boom".to_string()))
        );
    }

    #[test]
    fn untagged_lines_are_ignored() {
        assert_eq!(parse_frame("event: ping"), None);
        assert_eq!(parse_frame(""), None);
    }

    #[test]
    fn malformed_json_is_ignored() {
        assert_eq!(parse_frame("data: {not json"), None);
    }

    #[test]
    fn empty_object_is_ignored() {
        assert_eq!(parse_frame("data: {}"), None);
    }
}
