//! Argument parsing and command dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use healthgauge_core::Severity;
use healthgauge_telemetry::{LogFormat, LogOutput, LoggingConfig, init_logging};
use reqwest::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliResult, build_client, parse_api_key, parse_url};
use crate::commands::assess::handle_assess;
use crate::commands::show::handle_show;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const CLI_LOG_LEVEL: &str = "warn";

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    install_logging();

    let trace_id = Uuid::new_v4().to_string();
    tracing::debug!(
        trace_id = %trace_id,
        command = command_label(&cli.command),
        "starting command"
    );

    match dispatch(cli, &trace_id).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn install_logging() {
    let config = LoggingConfig {
        level: CLI_LOG_LEVEL,
        format: LogFormat::Pretty,
        output: LogOutput::Stderr,
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: logging unavailable: {err}");
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let client = build_client(&cli, trace_id)?;
    let ctx = AppContext {
        client,
        base_url: cli.api_url,
        api_key: parse_api_key(cli.api_key)?,
    };

    match cli.command {
        Command::Show => handle_show(&ctx, cli.output).await,
        Command::Assess(args) => handle_assess(&ctx, args, cli.output).await,
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Show => "show",
        Command::Assess(_) => "assess",
    }
}

#[derive(Parser)]
#[command(name = "healthgauge", about = "Terminal client for the health score service")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "HEALTHGAUGE_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(long, global = true, env = "HEALTHGAUGE_API_KEY")]
    pub(crate) api_key: Option<String>,
    #[arg(
        long,
        global = true,
        env = "HEALTHGAUGE_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the score once and draw the gauge.
    Show,
    /// Report a triage assessment that adjusts the score.
    Assess(AssessArgs),
}

#[derive(Args)]
pub(crate) struct AssessArgs {
    #[arg(value_enum)]
    pub(crate) severity: SeverityArg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum SeverityArg {
    Normal,
    Mild,
    Serious,
}

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Normal => Self::Normal,
            SeverityArg::Mild => Self::Mild,
            SeverityArg::Serious => Self::Serious,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}
