use crate::report::{run_report, ReportArgs};
use crate::CliError;
use clap::{Parser, Subcommand};
use scorecard_heatmap::config::AppConfig;
use scorecard_heatmap::error::AppError;
use scorecard_heatmap::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "scorecard-heatmap",
    about = "Aggregate scorecard rule outcomes into heatmap views",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a heatmap from a score snapshot and optional catalog
    Report(ReportArgs),
}

pub(crate) fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = AppConfig::load().map_err(AppError::from)?;
    telemetry::init(&config.telemetry).map_err(AppError::from)?;

    match cli.command {
        Command::Report(args) => run_report(args, &config.report),
    }
}
