pub mod app;
pub mod backend;
pub mod cli;
pub mod constants;
pub mod locale;
pub mod runtime;
pub mod selector;
pub mod session;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use backend::{AssistantBackend, HttpBackend};
pub use selector::ModelSelector;
pub use session::SessionController;
pub use tui::run_ui;
pub use utils::SecretaryError;
