use crate::http::{build_client, map_reqwest_error, BackendSettings};
use crate::types::{TransportError, WorkflowError};
use crate::wire::{SaveRequest, SaveResponse};

/// Collaborator that persists an ingest: card creation, session bookkeeping
/// and (when confirmed) the vault write.
#[async_trait::async_trait]
pub trait SaveClient: Send + Sync {
    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, WorkflowError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSaveClient {
    client: reqwest::Client,
    url: String,
}

impl ReqwestSaveClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(settings, true)?,
            url: settings.endpoint(&settings.save_path),
        })
    }
}

#[async_trait::async_trait]
impl SaveClient for ReqwestSaveClient {
    async fn save(&self, request: &SaveRequest) -> Result<SaveResponse, WorkflowError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()).into());
        }
        response
            .json()
            .await
            .map_err(|err| WorkflowError::Decode(err.to_string()))
    }
}
