//! CLI argument definitions using clap derive macros.
//!
//! Crawl settings live in the config file; the flags only control logging
//! and where that file is read from.

use std::path::PathBuf;

use clap::Parser;

/// Download original-quality images from a Nitter profile, resuming where the
/// last run stopped.
#[derive(Parser, Debug)]
#[command(name = "nitter-dl")]
#[command(author, version)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Config file path (defaults to $XDG_CONFIG_HOME/nitter-dl/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Log level used when `RUST_LOG` is not set.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
