use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use nitter_dl::{CrawlSummary, Crawler};
use tracing::{debug, info};

use crate::app::{config_manager, progress_manager::ProgressDisplay, terminal};
use crate::cli::Args;

pub(crate) async fn run_downloader(args: &Args) -> Result<CrawlSummary> {
    let config = config_manager::resolve_config(args.config.as_deref())?;

    let user_dir = config.user_dir();
    std::fs::create_dir_all(&user_dir)
        .with_context(|| format!("Failed to create output directory '{}'", user_dir.display()))?;
    terminal::init_tracing(args.default_log_level(), &config.error_log_path())?;

    debug!(?args, "CLI arguments parsed");
    info!(
        username = %config.username,
        instance = %config.instance,
        dir = %user_dir.display(),
        "nitter-dl starting"
    );

    let crawler = Crawler::new(config)?;
    let progress = ProgressDisplay::new(terminal::should_show_progress(
        io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    ));
    let summary = crawler.run(&progress).await?;
    Ok(summary)
}
