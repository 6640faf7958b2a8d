//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

/// OKR Coach - guided OKR, life vision and weekly planning
#[derive(Parser)]
#[command(
    name = "oc",
    about = "LLM-guided OKR, life vision and weekly-plan coach",
    version = env!("CARGO_PKG_VERSION"),
    after_help = after_help(),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the pipeline API over HTTP
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Run the six-step wizard in the terminal
    Wizard {
        /// File the wizard state is saved to and restored from
        #[arg(short, long)]
        state_file: Option<PathBuf>,
    },

    /// Run one pipeline operation with a JSON request
    Call {
        /// Operation to run
        #[arg(value_enum)]
        operation: Operation,

        /// Request JSON file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List the persona catalog
    Personas,
}

/// Pipeline operations reachable through `oc call`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    Chat,
    ExtractOkr,
    ClassifyPersona,
    GenerateVision,
    WeeklyPlan,
    Calendar,
    Feedback,
}

impl Operation {
    /// Whether the operation reads a request body
    pub fn takes_input(self) -> bool {
        !matches!(self, Operation::Calendar)
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("okrcoach")
        .join("logs")
        .join("okrcoach.log")
}

fn after_help() -> String {
    format!("Logs are written to: {}", get_log_path().display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_call() {
        let cli = Cli::try_parse_from(["oc", "call", "extract-okr", "--input", "req.json"]).unwrap();
        match cli.command {
            Some(Command::Call { operation, input }) => {
                assert_eq!(operation, Operation::ExtractOkr);
                assert_eq!(input, Some(PathBuf::from("req.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["oc", "serve", "--log-level", "debug", "--bind", "0.0.0.0:9000"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Some(Command::Serve { bind: Some(ref b) }) if b == "0.0.0.0:9000"));
    }

    #[test]
    fn test_calendar_takes_no_input() {
        assert!(!Operation::Calendar.takes_input());
        assert!(Operation::Chat.takes_input());
    }
}
