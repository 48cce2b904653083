use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::traits::AssistantBackend;
use super::types::{ChatReply, ChatRequest, HealthReport, KeyInfoReport};
use crate::constants::{CHAT_ENDPOINT, HEALTH_CHECK_TIMEOUT_SECS, HEALTH_ENDPOINT, KEY_INFO_ENDPOINT};
use crate::utils::SecretaryError;

/// Longest slice of an error body carried into a message
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for the assistant service
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for `base_url`
    ///
    /// Without a timeout, a hung request never resolves on its own.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, SecretaryError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SecretaryError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Interpret a `/api/chat` response body
///
/// The service answers failures with HTTP 500 and the same JSON envelope,
/// so the body decides the outcome, not the status code.
pub(crate) fn parse_chat_body(status: StatusCode, body: &str) -> Result<ChatReply, SecretaryError> {
    match serde_json::from_str::<ChatReply>(body) {
        Ok(reply) => Ok(reply),
        Err(e) if status.is_success() => Err(SecretaryError::Decode(e.to_string())),
        Err(_) => Err(SecretaryError::Status {
            status: status.as_u16(),
            body: truncate(body.trim()),
        }),
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, SecretaryError> {
        let url = self.url(CHAT_ENDPOINT);
        debug!(%url, model = ?request.model, "sending chat request");

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), bytes = body.len(), "chat response received");
        parse_chat_body(status, &body)
    }

    async fn key_info(&self) -> Result<KeyInfoReport, SecretaryError> {
        let url = self.url(KEY_INFO_ENDPOINT);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SecretaryError::Status {
                status: status.as_u16(),
                body: truncate(body.trim()),
            });
        }

        Ok(response.json::<KeyInfoReport>().await?)
    }

    async fn health(&self) -> Result<HealthReport, SecretaryError> {
        let url = self.url(HEALTH_ENDPOINT);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SecretaryError::Status {
                status: response.status().as_u16(),
                body: String::new(),
            });
        }

        Ok(response.json::<HealthReport>().await?)
    }
}
