mod cli;
mod infra;
mod render;
mod report;

use scorecard_heatmap::error::AppError;

pub use infra::InputError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Input(#[from] InputError),
}

pub fn run() -> Result<(), CliError> {
    cli::run()
}
