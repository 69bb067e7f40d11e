use serde::{Deserialize, Serialize};

use crate::types::HistoryEntry;

/// Body of the chat completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<WireMessage>,
}

impl ChatRequest {
    /// Entries carrying images become multipart content (text part first,
    /// then one `image_url` part per attachment, in arrival order); plain
    /// entries stay plain strings.
    pub fn from_history(history: &[HistoryEntry]) -> Self {
        let messages = history
            .iter()
            .map(|entry| {
                let content = if entry.images.is_empty() {
                    WireContent::Text(entry.content.clone())
                } else {
                    let mut parts = Vec::with_capacity(entry.images.len() + 1);
                    if !entry.content.is_empty() {
                        parts.push(ContentPart::Text {
                            text: entry.content.clone(),
                        });
                    }
                    for url in &entry.images {
                        parts.push(ContentPart::ImageUrl {
                            image_url: ImageUrl { url: url.clone() },
                        });
                    }
                    WireContent::Parts(parts)
                };
                WireMessage {
                    role: entry.role.clone(),
                    content,
                }
            })
            .collect();
        Self { messages }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireMessage {
    pub role: String,
    pub content: WireContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizeRequest {
    #[serde(rename = "rawNotes")]
    pub raw_notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrganizeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub organized: Option<OrganizedDoc>,
    #[serde(default)]
    pub destination: Option<DestinationBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrganizedDoc {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub checklist: Vec<String>,
    #[serde(default)]
    pub suggested_links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DestinationBlock {
    #[serde(default)]
    pub options: Vec<DestinationOptionDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DestinationOptionDto {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub exists: bool,
}

/// Usable organize result: a response that reported success and carried both
/// the organized document and the destination block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizePayload {
    pub organized: OrganizedDoc,
    pub options: Vec<DestinationOptionDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub message: String,
    pub sync_to_obsidian: bool,
    /// `anki`, `obsidian` or `all`.
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organized_markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organized_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_write: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub cards_created: Option<u32>,
    #[serde(default)]
    pub session_saved: Option<bool>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub obsidian_synced: Option<bool>,
    #[serde(default)]
    pub obsidian_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_only_history_serializes_as_plain_strings() {
        let request = ChatRequest::from_history(&[HistoryEntry {
            role: "user".to_string(),
            content: "hello".to_string(),
            images: Vec::new(),
        }]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"messages": [{"role": "user", "content": "hello"}]})
        );
    }

    #[test]
    fn image_bearing_history_serializes_as_multipart() {
        let request = ChatRequest::from_history(&[HistoryEntry {
            role: "user".to_string(),
            content: "see this".to_string(),
            images: vec!["data:image/png;base64,AAAA".to_string()],
        }]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": "see this"},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}},
                ],
            }]})
        );
    }

    #[test]
    fn save_request_omits_absent_optionals() {
        let request = SaveRequest {
            message: "raw".to_string(),
            sync_to_obsidian: false,
            mode: "anki".to_string(),
            destination_path: None,
            organized_markdown: None,
            organized_title: None,
            confirm_write: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "raw", "syncToObsidian": false, "mode": "anki"})
        );
    }

    #[test]
    fn save_response_tolerates_missing_fields() {
        let response: SaveResponse = serde_json::from_str(r#"{"response":"ok"}"#).unwrap();
        assert_eq!(response.response, "ok");
        assert_eq!(response.cards_created, None);
        assert_eq!(response.session_saved, None);
    }
}
