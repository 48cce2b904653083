use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEFAULT_BACKEND_URL, DEFAULT_MODEL, GEMINI_FLASH, GEMINI_PRO};
use crate::locale::Locale;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Assistant service connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Models offered in the selector
    #[serde(default)]
    pub models: ModelsConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Assistant service connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL the `/api/...` paths are appended to
    pub base_url: String,
    /// Per-request timeout; unset means wait indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Send the selected model and override credential with each message
    pub forward_selection: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: None,
            forward_selection: true,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// A model the user can pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOption {
    pub id: String,
    pub display_name: String,
}

impl ModelOption {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Model catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Model used until the user picks another
    pub default: String,
    pub available: Vec<ModelOption>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_MODEL.to_string(),
            available: vec![
                ModelOption::new(GEMINI_PRO, "Gemini 2.5 Pro"),
                ModelOption::new(GEMINI_FLASH, "Gemini 2.5 Flash"),
            ],
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UIConfig {
    /// Language for greetings, labels and error notices
    pub locale: Locale,
    /// Start the timeline with an assistant greeting
    pub greeting: bool,
    /// Show the model/key pool footer
    pub show_selector: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            greeting: true,
            show_selector: true,
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir()?;
    let global_config = config_dir.join("config.toml");
    let local_config = PathBuf::from(".secretary/config.toml");

    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    // SECRETARY_BACKEND__BASE_URL -> backend.base_url
    figment = figment.merge(Env::prefixed("SECRETARY_").split("__"));

    figment
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from a single file, on top of the defaults
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "secretary") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("secretary");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config_file = config_dir.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        println!("Created default configuration at: {}", config_file.display());
    }

    let local_example = PathBuf::from(".secretary/config.toml.example");
    if !local_example.exists() {
        if let Some(parent) = local_example.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let example_config = r#"# Secretary Project Configuration
# This file overrides global settings for this directory

[backend]
base_url = "http://localhost:5000"
# request_timeout_secs = 120
forward_selection = true

[models]
default = "gemini-2.5-flash"

[ui]
locale = "en"
greeting = true
"#;
        std::fs::write(&local_example, example_config)?;
        println!("Created example configuration at: {}", local_example.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.backend.request_timeout(), None);
        assert_eq!(config.models.default, "gemini-2.5-pro");
        assert_eq!(config.models.available.len(), 2);
        assert_eq!(config.ui.locale, Locale::ZhTw);
    }

    #[test]
    fn test_partial_file_merges_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[backend]
base_url = "http://assistant.local:8080"
request_timeout_secs = 30

[ui]
locale = "en"
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.backend.base_url, "http://assistant.local:8080");
        assert_eq!(config.backend.request_timeout(), Some(Duration::from_secs(30)));
        assert!(config.backend.forward_selection);
        assert_eq!(config.ui.locale, Locale::En);
        assert!(config.ui.greeting);
        assert_eq!(config.models, ModelsConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved.toml");

        let mut config = Config::default();
        config.models.default = "gemini-2.5-flash".to_string();
        save_config(&config, Some(path.clone())).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_config_from(&dir.path().join("nope.toml")).is_err());
    }
}
