use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::{
    app::{get_config_dir, load_config, load_config_from, Config},
    backend::{AssistantBackend, HttpBackend},
    cli::{handle_command, Cli},
    selector::ModelSelector,
    session::SessionController,
    tui::{run_ui, App},
    utils::{init_file_logger, init_logger},
};

/// Load configuration and fold in command-line overrides
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        load_config_from(config_path)?
    } else {
        match load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("⚠️  Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    };

    apply_overrides(&mut config, cli);
    Ok(config)
}

/// CLI flags win over every config source
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(backend) = &cli.backend {
        config.backend.base_url = backend.clone();
    }
    if let Some(model) = &cli.model {
        config.models.default = model.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.backend.request_timeout_secs = Some(timeout);
    }
    if let Some(locale) = cli.locale {
        config.ui.locale = locale;
    }
}

/// Wire a selector and session together from config
pub fn build_session(config: &Config) -> (ModelSelector, SessionController) {
    let selector = ModelSelector::from_config(&config.models, config.ui.locale);
    let mut session = SessionController::new(config.ui.locale)
        .with_selection(selector.subscribe(), config.backend.forward_selection);
    if config.ui.greeting {
        session.seed_greeting();
    }
    (selector, session)
}

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli)?;
        Ok(Self { cli, config })
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        // Subcommands print to the terminal, so log there too
        if let Some(command) = &self.cli.command {
            init_logger(self.cli.verbose);
            if handle_command(command, &self.config).await? {
                return Ok(());
            }
        } else {
            self.init_tui_logging();
        }

        let backend: Arc<dyn AssistantBackend> = Arc::new(HttpBackend::new(
            &self.config.backend.base_url,
            self.config.backend.request_timeout(),
        )?);

        let (mut selector, session) = build_session(&self.config);
        if let Some(key) = &self.cli.api_key {
            selector.set_override_credential(key);
        }

        println!(
            "Starting Secretary with {} via {}",
            selector.active_model().green(),
            self.config.backend.base_url.cyan()
        );

        let mut app = App::new(session, selector, backend);
        app.show_selector = self.config.ui.show_selector;

        run_ui(app).await
    }

    fn init_tui_logging(&self) {
        let log_path = get_config_dir().map(|dir| dir.join("secretary.log"));
        match log_path {
            Ok(path) => {
                if let Err(e) = init_file_logger(self.cli.verbose, &path) {
                    eprintln!("⚠️  Failed to open log file {}: {}", path.display(), e);
                }
            }
            Err(e) => eprintln!("⚠️  No config directory for logs: {}", e),
        }
    }
}
