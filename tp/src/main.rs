//! TaskPlanner - plan your day with a remote scheduling service
//!
//! CLI entry point for the interactive editor and one-shot planning.

use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{info, warn};

use taskplanner::cli::{Cli, Command, OutputFormat, get_log_path};
use taskplanner::config::Config;
use taskplanner::display::{self, LineKind};
use taskplanner::editor::TaskList;
use taskplanner::lifecycle::{PlanLifecycle, RequestState};
use taskplanner::plan::{self, PlanService};
use taskplanner::tui;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")?
        .with_base_url(cli.url.clone());
    config.validate().context("Invalid configuration")?;

    info!("TaskPlanner loaded config: service={}", config.service.base_url);

    let service: Arc<dyn PlanService> =
        plan::create_service(&config.service).context("Failed to create planning client")?;

    // Dispatch command
    match cli.command {
        None | Some(Command::Tui) => {
            tui::run(service, &config.tui).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Plan { tasks, format }) => cmd_plan(service.as_ref(), tasks, format).await,
        Some(Command::Health) => cmd_health(service.as_ref(), &config).await,
    }
}

/// Submit the given tasks once and print the result
async fn cmd_plan(service: &dyn PlanService, tasks: Vec<String>, format: OutputFormat) -> Result<ExitCode> {
    let tasks = TaskList::from_texts(tasks);
    let mut lifecycle = PlanLifecycle::new();

    if matches!(format, OutputFormat::Text) && !tasks.is_blank() {
        eprintln!("{}", display::BUSY_TEXT.dimmed());
    }

    let state = lifecycle.run(&tasks, service).await;

    match format {
        OutputFormat::Json => {
            let json = display::to_json(&state);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => print_state(&state),
    }

    if matches!(state, RequestState::Failed(_)) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Print a settled state as coloured text
fn print_state(state: &RequestState) {
    for line in display::text_lines(state) {
        match line.kind {
            LineKind::Heading => println!("{}\n", line.text.bold().underline()),
            LineKind::Explanation => println!("{}\n", line.text),
            LineKind::Task => println!("  {}", line.text.bold()),
            LineKind::Time => println!("    {}", line.text.dimmed()),
            LineKind::Busy => eprintln!("{}", line.text.dimmed()),
            LineKind::Error => eprintln!("{} {}", "✗".red(), line.text.red()),
        }
    }
}

/// Probe the service health endpoint
async fn cmd_health(service: &dyn PlanService, config: &Config) -> Result<ExitCode> {
    let url = config.service.health_url();
    match service.health().await {
        Ok(health) if health.is_healthy() => {
            println!(
                "{} {} {} at {}",
                "✓".green(),
                health.service.cyan(),
                health.version.dimmed(),
                url
            );
            Ok(ExitCode::SUCCESS)
        }
        Ok(health) => {
            println!("{} Service at {} reports status: {}", "⚠".yellow(), url, health.status);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            warn!(error = %e, "Health probe failed");
            eprintln!("{} Planning service unreachable at {}: {}", "✗".red(), url, e);
            Ok(ExitCode::FAILURE)
        }
    }
}
