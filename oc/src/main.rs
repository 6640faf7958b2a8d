//! OKR Coach
//!
//! CLI entry point: HTTP server, terminal wizard and one-shot operations.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use okrcoach::api::Api;
use okrcoach::cli::{Cli, Command, Operation, get_log_path};
use okrcoach::config::Config;
use okrcoach::console::Console;
use okrcoach::domain::PersonaCode;
use okrcoach::server;
use okrcoach::session::Session;
use okrcoach::wizard::WizardController;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "okrcoach loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Serve { bind }) => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            cmd_serve(&config, &bind).await
        }
        Some(Command::Wizard { state_file }) => {
            let state_file = state_file.or_else(|| config.wizard.state_file.clone());
            cmd_wizard(&config, state_file).await
        }
        Some(Command::Call { operation, input }) => cmd_call(&config, operation, input).await,
        Some(Command::Personas) => cmd_personas(),
        None => cmd_wizard(&config, config.wizard.state_file.clone()).await,
    }
}

fn build_api(config: &Config) -> Result<Arc<Api>> {
    config.validate()?;
    Ok(Arc::new(Api::from_config(config)?))
}

async fn cmd_serve(config: &Config, bind: &str) -> Result<()> {
    debug!(%bind, "cmd_serve: called");
    let api = build_api(config)?;
    println!("{} Serving on http://{}", "✓".green(), bind);
    server::serve(api, bind).await
}

async fn cmd_wizard(config: &Config, state_file: Option<PathBuf>) -> Result<()> {
    debug!(?state_file, "cmd_wizard: called");
    let api = build_api(config)?;
    let wizard = WizardController::new(api, Session::from_config(config), &config.wizard);
    Console::new(wizard, state_file).run().await
}

fn read_request<T: DeserializeOwned>(input: Option<&PathBuf>) -> Result<T> {
    let raw = match input {
        Some(path) => fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Invalid request JSON")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_call(config: &Config, operation: Operation, input: Option<PathBuf>) -> Result<()> {
    debug!(?operation, ?input, "cmd_call: called");
    if input.is_some() && !operation.takes_input() {
        warn!(?operation, "cmd_call: operation takes no request, ignoring --input");
    }
    let api = build_api(config)?;
    let session = Session::from_config(config);
    let input = input.as_ref();

    match operation {
        Operation::Chat => print_json(&api.chat(read_request(input)?).await?),
        Operation::ExtractOkr => print_json(&api.extract_okr(read_request(input)?).await?),
        Operation::ClassifyPersona => print_json(&api.classify_persona(read_request(input)?).await?),
        Operation::GenerateVision => print_json(&api.generate_vision(read_request(input)?).await?),
        Operation::WeeklyPlan => print_json(&api.generate_weekly_plan(read_request(input)?).await?),
        Operation::Calendar => print_json(&api.calendar(&session).await?),
        Operation::Feedback => print_json(&api.submit_feedback(&session, read_request(input)?).await?),
    }
}

fn cmd_personas() -> Result<()> {
    debug!("cmd_personas: called");
    for profile in PersonaCode::catalog() {
        println!("{} {}", profile.code.to_string().bold(), profile.name.bright_cyan());
        println!("  {}", profile.description);
        println!("  {} {}", "Traits:".dimmed(), profile.traits.join(", "));
        println!("  {} {}", "Focus:".dimmed(), profile.vision_focus);
    }
    Ok(())
}
