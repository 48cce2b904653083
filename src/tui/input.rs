use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::constants::{UI_PAGE_LINES, UI_SCROLL_LINES};

/// What the input line is currently editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Message,
    /// Editing the override credential; the draft message is left alone
    Credential,
}

/// Handle input processing
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Process a key event
    pub fn handle_key(&self, key: KeyEvent, mode: InputMode) -> InputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match (key.code, mode) {
            (KeyCode::Char('c'), _) if ctrl => InputAction::Quit,
            (KeyCode::Char('k'), _) if ctrl => InputAction::EditCredential,
            (KeyCode::Esc, InputMode::Message) => InputAction::Quit,
            (KeyCode::Esc, InputMode::Credential) => InputAction::CancelEdit,
            (KeyCode::Enter, _) => InputAction::Submit,
            (KeyCode::Tab, InputMode::Message) => InputAction::CycleModel,
            (KeyCode::Char(c), _) if !ctrl => InputAction::Insert(c),
            (KeyCode::Backspace, _) => InputAction::Delete,
            (KeyCode::Up, _) => InputAction::ScrollUp(UI_SCROLL_LINES),
            (KeyCode::Down, _) => InputAction::ScrollDown(UI_SCROLL_LINES),
            (KeyCode::PageUp, _) => InputAction::ScrollUp(UI_PAGE_LINES),
            (KeyCode::PageDown, _) => InputAction::ScrollDown(UI_PAGE_LINES),
            _ => InputAction::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    Quit,
    Insert(char),
    Delete,
    CycleModel,
    EditCredential,
    CancelEdit,
    ScrollUp(u16),
    ScrollDown(u16),
    None,
}
