use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    app::Config,
    backend::AssistantBackend,
    cli::OutputFormat,
    selector::ModelSelector,
    session::{FailureKind, Message, SessionController, SubmitOutcome},
};

use super::orchestrator::build_session;

/// Result of a non-interactive run
#[derive(Debug, Serialize, Deserialize)]
pub struct NonInteractiveResult {
    /// The prompt that was sent
    pub prompt: String,
    /// Text of the assistant entry
    pub response: String,
    /// fulfilled, application_error, transport_error or rejected
    pub outcome: String,
    /// Entries added by this run
    pub messages: Vec<Message>,
    /// Metadata about the execution
    pub metadata: ExecutionMetadata,
}

impl NonInteractiveResult {
    pub fn is_error(&self) -> bool {
        self.outcome != "fulfilled"
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Model selected when the message was sent
    pub model: String,
    /// Keys the service reported for that model
    pub key_count: usize,
    /// Rotation strategy label, empty when unknown
    pub strategy: String,
    /// Whether the key info fetch succeeded
    pub key_info_loaded: bool,
    /// Execution time in milliseconds
    pub duration_ms: u128,
}

/// Non-interactive runner for sending a single message
pub struct NonInteractiveRunner {
    backend: Arc<dyn AssistantBackend>,
    selector: ModelSelector,
    session: SessionController,
    api_key: Option<String>,
    model: Option<String>,
}

impl NonInteractiveRunner {
    pub fn new(
        config: &Config,
        backend: Arc<dyn AssistantBackend>,
        model: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        let mut config = config.clone();
        // A one-shot run prints only the new exchange
        config.ui.greeting = false;
        let (selector, session) = build_session(&config);

        Self {
            backend,
            selector,
            session,
            api_key,
            model,
        }
    }

    /// Send `prompt` and collect the resulting exchange
    pub async fn execute(&mut self, prompt: String) -> NonInteractiveResult {
        let start_time = std::time::Instant::now();

        let key_info_loaded = self.selector.initialize(self.backend.as_ref()).await;
        // Explicit choices are applied after metadata so they are not reconciled away
        if let Some(model) = self.model.take() {
            self.selector.select_model(model);
        }
        if let Some(key) = self.api_key.take() {
            self.selector.set_override_credential(&key);
        }

        let before = self.session.timeline().len();
        let outcome = self.session.submit(&prompt, self.backend.as_ref()).await;
        let messages: Vec<Message> = self.session.timeline().messages()[before..].to_vec();

        let response = match outcome {
            SubmitOutcome::Rejected(_) => String::new(),
            _ => self
                .session
                .timeline()
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default(),
        };
        let outcome = match outcome {
            SubmitOutcome::Fulfilled => "fulfilled",
            SubmitOutcome::Failed(FailureKind::Application) => "application_error",
            SubmitOutcome::Failed(FailureKind::Transport) => "transport_error",
            SubmitOutcome::Rejected(_) => "rejected",
        };

        let summary = self.selector.active_summary();
        NonInteractiveResult {
            prompt,
            response,
            outcome: outcome.to_string(),
            messages,
            metadata: ExecutionMetadata {
                model: summary.model,
                key_count: summary.key_count,
                strategy: summary.strategy_label,
                key_info_loaded,
                duration_ms: start_time.elapsed().as_millis(),
            },
        }
    }

    /// Format the result based on output format
    pub fn format_result(&self, result: &NonInteractiveResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(result)
                .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)),
            OutputFormat::Text => result.response.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ChatReply, ChatRequest, KeyInfoReport, KeyPoolReport, MockAssistantBackend};
    use crate::session::Role;
    use crate::utils::SecretaryError;
    use pretty_assertions::assert_eq;

    fn en_config() -> Config {
        let mut config = Config::default();
        config.ui.locale = crate::locale::Locale::En;
        config
    }

    #[tokio::test]
    async fn test_key_info_failure_leaves_chat_working() {
        let mut backend = MockAssistantBackend::new();
        backend
            .expect_key_info()
            .times(1)
            .returning(|| Err(SecretaryError::Status { status: 404, body: "Not Found".into() }));
        backend
            .expect_chat()
            .times(1)
            .returning(|_| Ok(ChatReply::ok("OK")));

        let mut runner = NonInteractiveRunner::new(&en_config(), Arc::new(backend), None, None);
        let result = runner.execute("hi".to_string()).await;

        assert_eq!(result.outcome, "fulfilled");
        assert_eq!(result.response, "OK");
        assert!(!result.is_error());
        assert!(!result.metadata.key_info_loaded);
        assert_eq!(result.metadata.key_count, 0);
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_explicit_model_and_key_are_forwarded() {
        let mut backend = MockAssistantBackend::new();
        backend.expect_key_info().returning(|| {
            let mut report = KeyInfoReport::new();
            report.insert(
                "gemini-2.5-pro".into(),
                KeyPoolReport {
                    key_count: 3,
                    strategy: "round-robin".into(),
                },
            );
            Ok(report)
        });
        backend
            .expect_chat()
            .withf(|req: &ChatRequest| {
                req.model.as_deref() == Some("gemini-2.5-flash")
                    && req.api_key.as_deref() == Some("sk-x")
            })
            .times(1)
            .returning(|_| Ok(ChatReply::failed("quota exceeded")));

        let mut runner = NonInteractiveRunner::new(
            &en_config(),
            Arc::new(backend),
            Some("gemini-2.5-flash".into()),
            Some("sk-x".into()),
        );
        let result = runner.execute("hi".to_string()).await;

        assert_eq!(result.outcome, "application_error");
        assert!(result.response.contains("quota exceeded"));
        assert!(result.is_error());
        assert_eq!(result.metadata.model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_blank_prompt_is_rejected() {
        let mut backend = MockAssistantBackend::new();
        backend.expect_key_info().returning(|| Ok(KeyInfoReport::new()));
        backend.expect_chat().never();

        let mut runner = NonInteractiveRunner::new(&en_config(), Arc::new(backend), None, None);
        let result = runner.execute("   ".to_string()).await;
        assert_eq!(result.outcome, "rejected");
        assert!(result.messages.is_empty());

        let json = runner.format_result(&result, OutputFormat::Json);
        assert!(json.contains("\"outcome\": \"rejected\""));
    }
}
