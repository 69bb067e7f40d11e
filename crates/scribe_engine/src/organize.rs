use crate::http::{build_client, map_reqwest_error, BackendSettings};
use crate::types::{TransportError, WorkflowError};
use crate::wire::{OrganizePayload, OrganizeRequest, OrganizeResponse};

/// Shown when the backend fails without supplying its own message.
const GENERIC_ORGANIZE_ERROR: &str = "Failed to organize notes";

/// Collaborator that turns raw notes into a structured document plus
/// candidate destinations.
#[async_trait::async_trait]
pub trait OrganizeClient: Send + Sync {
    async fn organize(&self, raw_notes: &str) -> Result<OrganizePayload, WorkflowError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestOrganizeClient {
    client: reqwest::Client,
    url: String,
}

impl ReqwestOrganizeClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(settings, true)?,
            url: settings.endpoint(&settings.organize_path),
        })
    }
}

#[async_trait::async_trait]
impl OrganizeClient for ReqwestOrganizeClient {
    async fn organize(&self, raw_notes: &str) -> Result<OrganizePayload, WorkflowError> {
        let request = OrganizeRequest {
            raw_notes: raw_notes.to_string(),
        };
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()).into());
        }
        let response: OrganizeResponse = response
            .json()
            .await
            .map_err(|err| WorkflowError::Decode(err.to_string()))?;
        payload_from_response(response)
    }
}

/// A usable preview needs `success: true` plus both the organized document
/// and the destination block; anything less fails with the server-supplied
/// message or the generic one.
pub fn payload_from_response(response: OrganizeResponse) -> Result<OrganizePayload, WorkflowError> {
    let server_error = response.error.clone();
    if !response.success {
        return Err(WorkflowError::Backend(
            server_error.unwrap_or_else(|| GENERIC_ORGANIZE_ERROR.to_string()),
        ));
    }
    match (response.organized, response.destination) {
        (Some(organized), Some(destination)) => Ok(OrganizePayload {
            organized,
            options: destination.options,
        }),
        _ => Err(WorkflowError::Backend(
            server_error.unwrap_or_else(|| GENERIC_ORGANIZE_ERROR.to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::payload_from_response;
    use crate::types::WorkflowError;
    use crate::wire::OrganizeResponse;

    #[test]
    fn unsuccessful_response_surfaces_server_message() {
        let response: OrganizeResponse =
            serde_json::from_str(r#"{"success": false, "error": "too short"}"#).unwrap();
        assert_eq!(
            payload_from_response(response),
            Err(WorkflowError::Backend("too short".to_string()))
        );
    }

    #[test]
    fn success_without_destination_is_still_a_failure() {
        let response: OrganizeResponse = serde_json::from_str(
            r#"{"success": true, "organized": {"title": "t", "markdown": "m"}}"#,
        )
        .unwrap();
        assert_eq!(
            payload_from_response(response),
            Err(WorkflowError::Backend("Failed to organize notes".to_string()))
        );
    }

    #[test]
    fn complete_response_yields_payload() {
        let response: OrganizeResponse = serde_json::from_str(
            r#"{
                "success": true,
                "organized": {"title": "t", "markdown": "m", "checklist": ["a"], "suggested_links": []},
                "destination": {"options": [{"id": "recommended", "label": "Inbox", "path": "notes/inbox.md", "exists": true}]}
            }"#,
        )
        .unwrap();
        let payload = payload_from_response(response).unwrap();
        assert_eq!(payload.organized.title, "t");
        assert_eq!(payload.options.len(), 1);
        assert_eq!(payload.options[0].path, "notes/inbox.md");
    }
}
