use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use secretary::{
    backend::{AssistantBackend, HttpBackend},
    cli::Cli,
    runtime::{resolve_config, NonInteractiveRunner, Orchestrator},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(prompt) = cli.prompt.clone() {
        init_logger(cli.verbose);
        run_non_interactive(cli, prompt).await
    } else {
        let orchestrator = Orchestrator::new(cli)?;
        orchestrator.run().await
    }
}

/// Run in non-interactive mode
async fn run_non_interactive(cli: Cli, prompt: String) -> Result<()> {
    let config = resolve_config(&cli).context("failed to load configuration")?;

    let backend: Arc<dyn AssistantBackend> = Arc::new(HttpBackend::new(
        &config.backend.base_url,
        config.backend.request_timeout(),
    )
    .context("failed to create HTTP client")?);

    let mut runner = NonInteractiveRunner::new(&config, backend, cli.model.clone(), cli.api_key.clone());
    let result = runner.execute(prompt).await;

    println!("{}", runner.format_result(&result, cli.output_format));

    // Exit with appropriate code
    if result.is_error() {
        std::process::exit(1);
    }

    Ok(())
}
