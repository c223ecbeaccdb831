use crate::demo::{render_analysis, run_demo, DemoArgs};
use crate::infra::{analysis_service, load_request, parse_mode};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fundmatch_ai::config::AppConfig;
use fundmatch_ai::error::AppError;
use fundmatch_ai::workflows::funding::analysis::{AnalysisMode, ProgressUpdate};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(
    name = "Funding Match Analyzer",
    about = "Score SME funding applications for investors and applicants",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Analyze a single application described by a JSON request file
    Analyze(AnalyzeArgs),
    /// Run a canned end-to-end analysis with one simulated module outage
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Skip the hosted analysis functions and score every request from fallbacks
    #[arg(long)]
    pub(crate) offline: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Path to an analysis request (JSON, camelCase fields)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Override the request's mode (investor|sme)
    #[arg(long, value_parser = parse_mode)]
    pub(crate) mode: Option<AnalysisMode>,
    /// Skip the hosted analysis functions
    #[arg(long)]
    pub(crate) offline: bool,
    /// Print a readable summary instead of the JSON payload
    #[arg(long)]
    pub(crate) summary: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => run_analyze(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        input,
        mode,
        offline,
        summary,
    } = args;

    let config = AppConfig::load()?;
    let mut request = load_request(&input)?;
    if let Some(mode) = mode {
        request.mode = mode;
    }

    let service = analysis_service(&config.analysis, offline)?;

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let progress = |update: ProgressUpdate| {
        eprintln!("[{:>3}%] {}", update.percent, update.label);
    };
    let analysis = service
        .analyze_with_cancellation(&request, &progress, &token)
        .await?;

    if summary {
        render_analysis(&analysis);
    } else {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    }

    Ok(())
}
