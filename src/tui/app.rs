use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

use super::input::{InputAction, InputMode};
use crate::backend::{AssistantBackend, ChatReply, KeyInfoReport};
use crate::selector::ModelSelector;
use crate::session::{RejectReason, SessionController, TimelineEvent};
use crate::utils::SecretaryError;

/// Results delivered back to the UI loop by background tasks
#[derive(Debug)]
pub enum BackendEvent {
    ChatSettled(Result<ChatReply, SecretaryError>),
    KeyInfo(Result<KeyInfoReport, SecretaryError>),
}

/// Application state
pub struct App {
    /// Timeline and request lifecycle
    pub session: SessionController,
    /// Model and credential choice plus key pool metadata
    pub selector: ModelSelector,
    backend: Arc<dyn AssistantBackend>,
    timeline_events: broadcast::Receiver<TimelineEvent>,
    /// Is the app running?
    pub running: bool,
    /// Lines scrolled back from the newest message
    pub scroll_back: u16,
    pub input_mode: InputMode,
    /// Credential being typed while in credential mode
    pub credential_input: String,
    pub status_message: Option<String>,
    pub show_selector: bool,
    /// Spinner animation tick counter
    pub spinner_tick: u8,
}

impl App {
    /// Create a new app instance
    pub fn new(
        session: SessionController,
        selector: ModelSelector,
        backend: Arc<dyn AssistantBackend>,
    ) -> Self {
        let timeline_events = session.timeline().subscribe();
        Self {
            session,
            selector,
            backend,
            timeline_events,
            running: true,
            scroll_back: 0,
            input_mode: InputMode::default(),
            credential_input: String::new(),
            status_message: None,
            show_selector: true,
            spinner_tick: 0,
        }
    }

    /// Kick off the one-time key pool fetch
    pub fn start_key_info_fetch(&self, tx: mpsc::Sender<BackendEvent>) {
        let backend = self.backend.clone();
        tokio::spawn(async move {
            let result = backend.key_info().await;
            let _ = tx.send(BackendEvent::KeyInfo(result)).await;
        });
    }

    /// Apply one key-driven action
    pub fn handle_action(&mut self, action: InputAction, tx: &mpsc::Sender<BackendEvent>) {
        match (action, self.input_mode) {
            (InputAction::Quit, _) => self.quit(),
            (InputAction::Submit, InputMode::Message) => self.submit(tx),
            (InputAction::Submit, InputMode::Credential) => self.commit_credential(),
            (InputAction::CancelEdit, _) => {
                self.input_mode = InputMode::Message;
                self.credential_input.clear();
                self.clear_status();
            }
            (InputAction::EditCredential, InputMode::Message) => {
                self.input_mode = InputMode::Credential;
                self.credential_input = self
                    .selector
                    .selection()
                    .override_credential
                    .unwrap_or_default();
            }
            (InputAction::EditCredential, InputMode::Credential) => self.commit_credential(),
            (InputAction::CycleModel, _) => {
                let model = self.selector.cycle_model();
                let summary = self.selector.summary(&model);
                self.set_status(format!("Model: {} ({} keys)", summary.display_name, summary.key_count));
            }
            (InputAction::Insert(c), InputMode::Message) => {
                // Input is locked while a request is in flight
                if !self.session.is_pending() {
                    self.session.draft_mut().push(c);
                }
            }
            (InputAction::Insert(c), InputMode::Credential) => self.credential_input.push(c),
            (InputAction::Delete, InputMode::Message) => {
                if !self.session.is_pending() {
                    self.session.draft_mut().pop();
                }
            }
            (InputAction::Delete, InputMode::Credential) => {
                self.credential_input.pop();
            }
            (InputAction::ScrollUp(n), _) => self.scroll_back = self.scroll_back.saturating_add(n),
            (InputAction::ScrollDown(n), _) => self.scroll_back = self.scroll_back.saturating_sub(n),
            (InputAction::None, _) => {}
        }
    }

    /// Start a request for the current draft
    fn submit(&mut self, tx: &mpsc::Sender<BackendEvent>) {
        let input = self.session.draft().to_string();
        match self.session.begin(&input) {
            Ok(pending) => {
                let backend = self.backend.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = backend.chat(&pending.request).await;
                    let _ = tx.send(BackendEvent::ChatSettled(result)).await;
                });
            }
            Err(RejectReason::EmptyInput) => {}
            Err(reason) => debug!(?reason, "submit ignored"),
        }
    }

    fn commit_credential(&mut self) {
        self.selector.set_override_credential(&self.credential_input);
        self.credential_input.clear();
        self.input_mode = InputMode::Message;
        if self.selector.selection().override_credential.is_some() {
            self.set_status("Using custom API key");
        } else {
            self.set_status("Using service key rotation");
        }
    }

    /// Fold a background result into state
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::ChatSettled(result) => {
                self.session.complete(result);
            }
            BackendEvent::KeyInfo(result) => {
                self.selector.apply_key_info(result);
            }
        }
    }

    /// Drain timeline notifications; returns true if anything changed
    pub fn drain_timeline_events(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.timeline_events.try_recv() {
                Ok(TimelineEvent::Appended(_)) => {
                    // Follow the conversation
                    self.scroll_back = 0;
                    changed = true;
                }
                Ok(TimelineEvent::PendingChanged(_)) => changed = true,
                Err(broadcast::error::TryRecvError::Lagged(_)) => {
                    self.scroll_back = 0;
                    changed = true;
                }
                Err(_) => break,
            }
        }
        changed
    }

    pub fn tick(&mut self) {
        if self.session.is_pending() {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}
