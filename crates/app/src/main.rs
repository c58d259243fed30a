//! Grocer storefront CLI

use std::process::ExitCode;

use crate::cli::Cli;

mod cli;
mod config;
mod context;
mod errors;
mod logging;
mod render;

#[tokio::main]
pub async fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    if let Err(error) = logging::init(&cli.logging) {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
