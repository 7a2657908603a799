//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TaskPlanner - plan your day with a remote scheduling service
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Enter today's tasks and get back an ordered schedule",
    version,
    after_help = "Logs are written to: ~/.local/share/taskplanner/logs/taskplanner.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Planning service base URL (overrides config)
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Subcommand to execute (defaults to the TUI)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Launch the interactive task editor
    Tui,

    /// Submit tasks once and print the schedule
    Plan {
        /// Task descriptions, one per argument
        #[arg(value_name = "TASK")]
        tasks: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check that the planning service is reachable
    Health,
}

/// Output format for plan results
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Path of the log file written by the binary
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskplanner")
        .join("logs")
        .join("taskplanner.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["tp"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_tui() {
        let cli = Cli::parse_from(["tp", "tui"]);
        assert!(matches!(cli.command, Some(Command::Tui)));
    }

    #[test]
    fn test_cli_parse_plan() {
        let cli = Cli::parse_from(["tp", "plan", "Write report", "Buy milk"]);
        if let Some(Command::Plan { tasks, format }) = cli.command {
            assert_eq!(tasks, vec!["Write report", "Buy milk"]);
            assert!(matches!(format, OutputFormat::Text));
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_cli_parse_plan_without_tasks() {
        let cli = Cli::parse_from(["tp", "plan", "--format", "json"]);
        if let Some(Command::Plan { tasks, format }) = cli.command {
            assert!(tasks.is_empty());
            assert!(matches!(format, OutputFormat::Json));
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_cli_parse_health_with_url() {
        let cli = Cli::parse_from(["tp", "health", "--url", "http://127.0.0.1:9000"]);
        assert!(matches!(cli.command, Some(Command::Health)));
        assert_eq!(cli.url.as_deref(), Some("http://127.0.0.1:9000"));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["tp", "-c", "/path/to/config.yml", "health"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
    }
}
