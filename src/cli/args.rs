use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::locale::Locale;

#[derive(Parser, Debug)]
#[command(name = "secretary")]
#[command(version)]
#[command(about = "Terminal client for the AI secretary chat service", long_about = None)]
pub struct Cli {
    /// Base URL of the assistant service (e.g., http://localhost:5000)
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Model to chat with (e.g., gemini-2.5-pro, gemini-2.5-flash)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Use this credential instead of the service's key pool
    #[arg(long)]
    pub api_key: Option<String>,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Display language for replies and labels (zh-TW, en)
    #[arg(long, value_parser = parse_locale)]
    pub locale: Option<Locale>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Send a single message and print the reply
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "prompt")]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    Locale::from_str(s).ok_or_else(|| format!("unsupported locale '{}' (expected zh-TW or en)", s))
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Show key pool size and rotation strategy per model
    Keys,
    /// Start a chat session (default)
    Chat,
    /// Show version information
    Version,
    /// Check whether the assistant service is reachable
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt_mode() {
        let cli = Cli::try_parse_from([
            "secretary",
            "--backend",
            "http://10.0.0.2:5000",
            "-m",
            "gemini-2.5-flash",
            "-p",
            "hi",
            "--output-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.backend.as_deref(), Some("http://10.0.0.2:5000"));
        assert_eq!(cli.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(cli.prompt.as_deref(), Some("hi"));
        assert_eq!(cli.output_format, OutputFormat::Json);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_output_format_requires_prompt() {
        assert!(Cli::try_parse_from(["secretary", "--output-format", "json"]).is_err());
    }

    #[test]
    fn test_locale_flag() {
        let cli = Cli::try_parse_from(["secretary", "--locale", "en"]).unwrap();
        assert_eq!(cli.locale, Some(Locale::En));

        let cli = Cli::try_parse_from(["secretary", "--locale", "zh_tw"]).unwrap();
        assert_eq!(cli.locale, Some(Locale::ZhTw));

        assert!(Cli::try_parse_from(["secretary", "--locale", "fr"]).is_err());
    }

    #[test]
    fn test_subcommand() {
        let cli = Cli::try_parse_from(["secretary", "keys"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Keys));
    }
}
