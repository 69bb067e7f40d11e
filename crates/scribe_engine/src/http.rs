use std::time::Duration;

use crate::types::TransportError;

/// Where the backend collaborators live and how patient we are with them.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub chat_path: String,
    pub organize_path: String,
    pub save_path: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            chat_path: "/api/chat".to_string(),
            organize_path: "/api/organize-preview".to_string(),
            save_path: "/api/ingest".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl BackendSettings {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// The chat stream gets no overall request timeout: a healthy stream may stay
/// open far longer than any single round trip.
pub(crate) fn build_client(
    settings: &BackendSettings,
    with_request_timeout: bool,
) -> Result<reqwest::Client, TransportError> {
    let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
    if with_request_timeout {
        builder = builder.timeout(settings.request_timeout);
    }
    builder
        .build()
        .map_err(|err| TransportError::Network(err.to_string()))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout;
    }
    TransportError::Network(err.to_string())
}
