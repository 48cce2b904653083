use async_trait::async_trait;

use super::types::{ChatReply, ChatRequest, HealthReport, KeyInfoReport};
use crate::utils::SecretaryError;

/// The remote assistant service, as seen by the client
///
/// `Ok` from [`chat`](AssistantBackend::chat) means a well-formed envelope
/// arrived; it may still report `success: false`. `Err` means no usable
/// envelope exists (unreachable, timed out, or an unparseable body).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, SecretaryError>;

    /// Read the per-model credential pool metadata
    async fn key_info(&self) -> Result<KeyInfoReport, SecretaryError>;

    async fn health(&self) -> Result<HealthReport, SecretaryError>;
}
