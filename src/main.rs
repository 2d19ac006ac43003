//! CLI entry point for nitter-dl.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

mod app;
mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    match app::runtime::run_downloader(&args).await {
        Ok(summary) => {
            if !args.quiet {
                println!("{}", app::output::format_summary(&summary));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "run aborted");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
