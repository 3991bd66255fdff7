//! tline - status line host CLI

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use tline_cli::cmd::completions::completions;
use tline_cli::cmd::demo::{DemoOptions, demo};
use tline_cli::{Cli, Commands, resolve_config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never land inside the painted line
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Completions { shell } => {
            completions(shell);
            Ok(())
        }
        Commands::Demo {
            steps,
            delay_ms,
            label,
            width,
        } => demo(
            resolve_config(cli.config.as_deref(), cli.fps)?,
            &DemoOptions {
                steps,
                delay: Duration::from_millis(delay_ms),
                label,
                width,
            },
        ),
    }
}
