use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::timeline::{Role, Timeline};
use crate::backend::{AssistantBackend, ChatReply, ChatRequest};
use crate::constants::UNKNOWN_ERROR_DETAIL;
use crate::locale::Locale;
use crate::selector::ModelSelection;
use crate::utils::SecretaryError;

/// Where the controller is in one request/response cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Submitting,
    /// Transient: reply appended, about to return to `Idle`
    Fulfilled,
    /// Transient: error notice appended, about to return to `Idle`
    Failed,
}

/// Why a submission was refused without touching the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Input is empty or whitespace only
    EmptyInput,
    /// Another request is still in flight
    Busy,
    /// A completion arrived with no request in flight
    NothingInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The backend answered with `success: false`
    Application,
    /// No usable reply: unreachable, timed out, or unparseable
    Transport,
}

/// Result of one `submit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(RejectReason),
    Fulfilled,
    Failed(FailureKind),
}

/// An accepted submission whose reply has not been recorded yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub request: ChatRequest,
}

/// Drives one request/response cycle per submission
///
/// Submissions go through two phases. [`begin`](Self::begin) runs
/// synchronously: it appends the user entry, clears the draft and raises
/// the pending flag. [`complete`](Self::complete) appends exactly one
/// assistant entry and drops the flag. The user entry from the first phase
/// stays even when the request fails.
pub struct SessionController {
    timeline: Timeline,
    phase: SessionPhase,
    draft: String,
    locale: Locale,
    selection: Option<watch::Receiver<ModelSelection>>,
    forward_selection: bool,
}

impl SessionController {
    pub fn new(locale: Locale) -> Self {
        Self {
            timeline: Timeline::new(),
            phase: SessionPhase::Idle,
            draft: String::new(),
            locale,
            selection: None,
            forward_selection: false,
        }
    }

    /// Read the model selection at each submit; `forward` controls whether
    /// it is sent along with the message
    pub fn with_selection(mut self, selection: watch::Receiver<ModelSelection>, forward: bool) -> Self {
        self.selection = Some(selection);
        self.forward_selection = forward;
        self
    }

    /// Seed an empty timeline with the assistant greeting
    pub fn seed_greeting(&mut self) {
        if self.timeline.is_empty() {
            self.timeline.append(Role::Assistant, self.locale.greeting());
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.timeline.is_pending()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Phase one: validate, record the user entry and build the request
    pub fn begin(&mut self, raw_input: &str) -> Result<PendingRequest, RejectReason> {
        if raw_input.trim().is_empty() {
            return Err(RejectReason::EmptyInput);
        }
        if self.phase != SessionPhase::Idle || self.timeline.is_pending() {
            debug!("submission rejected, request already in flight");
            return Err(RejectReason::Busy);
        }

        self.phase = SessionPhase::Submitting;
        self.timeline.append(Role::User, raw_input);
        self.draft.clear();
        self.timeline.set_pending(true);

        let mut request = ChatRequest::new(raw_input);
        if self.forward_selection {
            if let Some(selection) = &self.selection {
                let selection = selection.borrow();
                request = request.with_selection(
                    Some(selection.active_model.clone()),
                    selection.override_credential.clone(),
                );
            }
        }

        info!(model = ?request.model, chars = raw_input.chars().count(), "request issued");
        Ok(PendingRequest { request })
    }

    /// Phase two: record the terminal entry for the in-flight request
    pub fn complete(&mut self, result: Result<ChatReply, SecretaryError>) -> SubmitOutcome {
        if self.phase != SessionPhase::Submitting {
            warn!("completion received with no request in flight");
            return SubmitOutcome::Rejected(RejectReason::NothingInFlight);
        }

        let (content, outcome) = match result {
            Ok(reply) if reply.success => (reply.response.unwrap_or_default(), SubmitOutcome::Fulfilled),
            Ok(reply) => {
                let detail = reply.error.unwrap_or_else(|| UNKNOWN_ERROR_DETAIL.to_string());
                warn!(error = %detail, "backend reported failure");
                (
                    self.locale.application_error(&detail),
                    SubmitOutcome::Failed(FailureKind::Application),
                )
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                (
                    self.locale.transport_error(&e.to_string()),
                    SubmitOutcome::Failed(FailureKind::Transport),
                )
            }
        };

        self.phase = match outcome {
            SubmitOutcome::Fulfilled => SessionPhase::Fulfilled,
            _ => SessionPhase::Failed,
        };
        self.timeline.append(Role::Assistant, content);
        self.timeline.set_pending(false);
        debug!(phase = ?self.phase, "request settled");
        self.phase = SessionPhase::Idle;

        outcome
    }

    /// Run a whole cycle against `backend`
    pub async fn submit(&mut self, raw_input: &str, backend: &dyn AssistantBackend) -> SubmitOutcome {
        let pending = match self.begin(raw_input) {
            Ok(pending) => pending,
            Err(reason) => return SubmitOutcome::Rejected(reason),
        };
        let result = backend.chat(&pending.request).await;
        self.complete(result)
    }

    /// Submit whatever is in the draft
    pub async fn submit_draft(&mut self, backend: &dyn AssistantBackend) -> SubmitOutcome {
        let input = self.draft.clone();
        self.submit(&input, backend).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockAssistantBackend;
    use crate::selector::ModelSelector;
    use pretty_assertions::assert_eq;

    fn replying(reply: ChatReply) -> MockAssistantBackend {
        let mut backend = MockAssistantBackend::new();
        backend
            .expect_chat()
            .times(1)
            .returning(move |_| Ok(reply.clone()));
        backend
    }

    fn silent() -> MockAssistantBackend {
        let mut backend = MockAssistantBackend::new();
        backend.expect_chat().never();
        backend
    }

    #[tokio::test]
    async fn test_successful_reply() {
        let backend = replying(ChatReply::ok("OK"));
        let mut session = SessionController::new(Locale::En);

        let outcome = session.submit("hi", &backend).await;
        assert_eq!(outcome, SubmitOutcome::Fulfilled);

        let messages = session.timeline().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!((messages[0].role, messages[0].content.as_str()), (Role::User, "hi"));
        assert_eq!((messages[1].role, messages[1].content.as_str()), (Role::Assistant, "OK"));
        assert!(!session.is_pending());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_application_failure() {
        let backend = replying(ChatReply::failed("quota exceeded"));
        let mut session = SessionController::new(Locale::ZhTw);

        let outcome = session.submit("hi", &backend).await;
        assert_eq!(outcome, SubmitOutcome::Failed(FailureKind::Application));

        let last = session.timeline().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.content.contains("quota exceeded"));
        assert!(last.content.starts_with("抱歉，發生了錯誤"));
        assert_eq!(session.timeline().len(), 2);
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_application_failure_without_detail() {
        let backend = replying(ChatReply::default());
        let mut session = SessionController::new(Locale::En);

        session.submit("hi", &backend).await;
        assert!(session.timeline().last().unwrap().content.contains(UNKNOWN_ERROR_DETAIL));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let mut backend = MockAssistantBackend::new();
        backend
            .expect_chat()
            .times(1)
            .returning(|_| Err(SecretaryError::Transport("timeout".into())));
        let mut session = SessionController::new(Locale::ZhTw);

        let outcome = session.submit("hi", &backend).await;
        assert_eq!(outcome, SubmitOutcome::Failed(FailureKind::Transport));

        let last = session.timeline().last().unwrap();
        assert!(last.content.contains("timeout"));
        assert!(last.content.starts_with("抱歉，無法連接到服務器"));
        assert_eq!(session.timeline().len(), 2);
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_blank_input_is_noop() {
        let backend = silent();
        let mut session = SessionController::new(Locale::En);

        for input in ["", "   ", "\n\t "] {
            let outcome = session.submit(input, &backend).await;
            assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::EmptyInput));
        }
        assert!(session.timeline().is_empty());
        assert!(!session.is_pending());
    }

    #[test]
    fn test_second_submit_while_pending_is_noop() {
        let mut session = SessionController::new(Locale::En);
        session.begin("first").unwrap();
        assert!(session.is_pending());
        assert_eq!(session.phase(), SessionPhase::Submitting);

        assert_eq!(session.begin("second"), Err(RejectReason::Busy));
        assert_eq!(session.timeline().len(), 1);
        assert!(session.is_pending());

        session.complete(Ok(ChatReply::ok("done")));
        assert_eq!(session.timeline().len(), 2);
        assert!(session.begin("third").is_ok());
    }

    #[test]
    fn test_raw_input_kept_verbatim_and_draft_cleared() {
        let mut session = SessionController::new(Locale::En);
        session.set_draft("  hello  ");

        let pending = session.begin("  hello  ").unwrap();
        assert_eq!(pending.request.message, "  hello  ");
        assert_eq!(session.timeline().last().unwrap().content, "  hello  ");
        assert_eq!(session.draft(), "");
    }

    #[test]
    fn test_user_entry_survives_failure() {
        let mut session = SessionController::new(Locale::En);
        session.begin("hi").unwrap();
        session.complete(Err(SecretaryError::Decode("expected value".into())));

        let messages = session.timeline().messages();
        assert_eq!(messages[0].content, "hi");
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_stray_completion_is_ignored() {
        let mut session = SessionController::new(Locale::En);
        let outcome = session.complete(Ok(ChatReply::ok("late")));
        assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::NothingInFlight));
        assert!(session.timeline().is_empty());
    }

    #[test]
    fn test_selection_forwarded_at_submit_time() {
        let mut selector = ModelSelector::new("gemini-2.5-pro", Vec::new(), Locale::En);
        let mut session = SessionController::new(Locale::En).with_selection(selector.subscribe(), true);

        selector.select_model("gemini-2.5-flash");
        selector.set_override_credential("sk-mine");

        let pending = session.begin("hi").unwrap();
        assert_eq!(pending.request.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(pending.request.api_key.as_deref(), Some("sk-mine"));
    }

    #[test]
    fn test_selection_not_forwarded_when_disabled() {
        let selector = ModelSelector::new("gemini-2.5-pro", Vec::new(), Locale::En);
        let mut session = SessionController::new(Locale::En).with_selection(selector.subscribe(), false);

        let pending = session.begin("hi").unwrap();
        assert_eq!(pending.request, ChatRequest::new("hi"));
    }

    #[tokio::test]
    async fn test_request_carries_message() {
        let mut backend = MockAssistantBackend::new();
        backend
            .expect_chat()
            .withf(|req: &ChatRequest| req.message == "hi" && req.model.is_none())
            .times(1)
            .returning(|_| Ok(ChatReply::ok("OK")));

        let mut session = SessionController::new(Locale::En);
        session.set_draft("hi");
        assert_eq!(session.submit_draft(&backend).await, SubmitOutcome::Fulfilled);
    }

    #[tokio::test]
    async fn test_each_accepted_submit_adds_two_entries() {
        let mut backend = MockAssistantBackend::new();
        backend.expect_chat().times(3).returning(|req| {
            if req.message.contains("fail") {
                Ok(ChatReply::failed("nope"))
            } else {
                Ok(ChatReply::ok("fine"))
            }
        });

        let mut session = SessionController::new(Locale::En);
        session.seed_greeting();
        let mut expected = 1;
        for input in ["a", "please fail", "b"] {
            session.submit(input, &backend).await;
            expected += 2;
            assert_eq!(session.timeline().len(), expected);
            assert!(!session.is_pending());
        }
    }

    #[test]
    fn test_greeting_only_on_empty_timeline() {
        let mut session = SessionController::new(Locale::ZhTw);
        session.seed_greeting();
        session.seed_greeting();
        assert_eq!(session.timeline().len(), 1);
        assert_eq!(session.timeline().messages()[0].role, Role::Assistant);
    }
}
