use anyhow::Result;
use colored::Colorize;

use crate::{
    app::{get_config_dir, init_config, Config},
    backend::{AssistantBackend, HttpBackend},
    selector::ModelSelector,
};

use super::Commands;

/// Handle CLI subcommands
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing Secretary configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Keys => {
            show_keys(config).await?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Status => {
            show_status(config).await?;
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to chat interface
    }
}

fn backend_for(config: &Config) -> Result<HttpBackend> {
    Ok(HttpBackend::new(
        &config.backend.base_url,
        config.backend.request_timeout(),
    )?)
}

/// Lines describing each model's key pool
pub fn key_lines(selector: &ModelSelector) -> Vec<String> {
    let mut models: Vec<String> = selector.catalog().iter().map(|m| m.id.clone()).collect();
    for model in selector.key_pools().models() {
        if !models.iter().any(|m| m == model) {
            models.push(model.to_string());
        }
    }

    models
        .iter()
        .map(|model| {
            let summary = selector.summary(model);
            let strategy = if summary.strategy_label.is_empty() {
                "-".to_string()
            } else {
                summary.strategy_label
            };
            format!(
                "{} ({} keys) | {}",
                summary.display_name, summary.key_count, strategy
            )
        })
        .collect()
}

/// Print key pool metadata for every known model
pub async fn show_keys(config: &Config) -> Result<()> {
    let backend = backend_for(config)?;
    let mut selector = ModelSelector::from_config(&config.models, config.ui.locale);

    if !selector.initialize(&backend).await {
        println!(
            "  [WARNING] Could not fetch key info from {}",
            backend.base_url()
        );
    }

    println!("Key pools:");
    for line in key_lines(&selector) {
        println!("  • {}", line.green());
    }
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("Secretary v{}", env!("CARGO_PKG_VERSION"));
    println!("   Terminal client for the AI secretary chat service");
}

/// Show status of the service and local configuration
async fn show_status(config: &Config) -> Result<()> {
    println!("Secretary Status:");
    println!();

    let backend = backend_for(config)?;
    match backend.health().await {
        Ok(report) if report.is_healthy() => {
            println!("  [OK] Service: {} ({})", backend.base_url(), report.status);
            if let Some(message) = report.message {
                println!("      • {}", message);
            }
        }
        Ok(report) => println!("  [WARNING] Service: {} reports {}", backend.base_url(), report.status),
        Err(e) => println!("  [ERROR] Service: {} unreachable ({})", backend.base_url(), e),
    }

    match backend.key_info().await {
        Ok(report) => println!("  [OK] Key info: {} models", report.len()),
        Err(e) => println!("  [WARNING] Key info: unavailable ({})", e),
    }

    match config.backend.request_timeout_secs {
        Some(secs) => println!("  [OK] Request timeout: {}s", secs),
        None => println!("  [OK] Request timeout: none"),
    }

    if let Ok(dir) = get_config_dir() {
        let config_path = dir.join("config.toml");
        if config_path.exists() {
            println!("  [OK] Configuration: {}", config_path.display());
        } else {
            println!("  [WARNING] Configuration: Not found (using defaults)");
        }
    }

    println!();
    Ok(())
}
