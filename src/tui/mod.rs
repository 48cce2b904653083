// Gateway module for TUI - follows the Train Station Pattern
// All external access must go through this gateway

mod app;
mod input;
mod render;
mod ui;

pub use app::{App, BackendEvent};
pub use input::{InputAction, InputHandler, InputMode};
pub use ui::run_ui;
