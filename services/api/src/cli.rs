use crate::commands::{
    run_import, run_report, run_score, run_template, ImportArgs, ReportArgs, ScoreArgs,
    TemplateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use readiness_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "AI Readiness Assessment",
    about = "Import questionnaires, score AI readiness, and export get-well plan reports",
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
    /// Import a questionnaire CSV and score it
    Import(ImportArgs),
    /// Re-run section scoring and plan generation for a company
    Score(ScoreArgs),
    /// Write the blank questionnaire template
    Template(TemplateArgs),
    /// Export a company's assessment report as HTML
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Import(args) => blocking(move || run_import(args)).await,
        Command::Score(args) => blocking(move || run_score(args)).await,
        Command::Template(args) => run_template(args),
        Command::Report(args) => blocking(move || run_report(args)).await,
    }
}

/// The completion client blocks, so commands that may call it leave the runtime.
async fn blocking<F>(command: F) -> Result<(), AppError>
where
    F: FnOnce() -> Result<(), AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(command).await?
}
