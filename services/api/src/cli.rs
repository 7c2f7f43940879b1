use crate::report::{run_options_report, run_stats_report, OptionsArgs, StatsArgs};
use crate::server;
use candidate_insights::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "candidate-insights-api",
    about = "Serve or report on election candidate statistics",
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
    /// Print aggregated statistics for a filter selection
    Stats(StatsArgs),
    /// Print the filter options available for a selection
    Options(OptionsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Candidate feed path; repeat to add fallbacks in order
    #[arg(long = "feed")]
    pub(crate) feeds: Vec<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Stats(args) => run_stats_report(args),
        Command::Options(args) => run_options_report(args),
    }
}
