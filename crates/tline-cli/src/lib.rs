//! tline - status line host
//!
//! Thin command-line host for `tline-core`. It wires columns together so the
//! engine can be watched on a real terminal and smoke-tested in CI.
//!
//! # Configuration
//!
//! Settings are resolved in this order, later entries winning:
//!
//! 1. built-in defaults
//! 2. `~/.config/tline/config.toml` (or `--config <path>` instead)
//! 3. `--fps` / `TLINE_FPS`

#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]

pub mod cmd;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tline_core::StatusLineConfig;

#[derive(Debug, Parser)]
#[command(name = "tline")]
#[command(author, version, about = "tline - live status lines for the terminal")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Repaints per second (overrides the config file)
    #[arg(long, global = true, env = "TLINE_FPS")]
    pub fps: Option<f64>,

    /// Log filter for stderr, e.g. `debug` or `tline_core=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a simulated job with a spinner, a label and a progress bar
    Demo {
        /// Units of work to simulate
        #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u64).range(1..))]
        steps: u64,
        /// Delay between units of work, in milliseconds
        #[arg(long, default_value_t = 20)]
        delay_ms: u64,
        /// Text shown next to the spinner
        #[arg(long, default_value = "working")]
        label: String,
        /// Width of the label column
        #[arg(long, default_value_t = 16)]
        width: u16,
    },
    /// Print a shell completion script to stdout
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

/// Default config file location, e.g. `~/.config/tline/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tline").join("config.toml"))
}

/// Build the effective configuration from file and overrides.
pub fn resolve_config(explicit: Option<&Path>, fps: Option<f64>) -> Result<StatusLineConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    };

    let mut config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            StatusLineConfig::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => StatusLineConfig::default(),
    };

    if let Some(fps) = fps {
        config.fps = fps;
        config.validate().context("invalid --fps")?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_explicit_config_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fps = 8.0\nhide_cursor = false").unwrap();

        let config = resolve_config(Some(file.path()), None).unwrap();
        assert!((config.fps - 8.0).abs() < f64::EPSILON);
        assert!(!config.hide_cursor);
    }

    #[test]
    fn test_fps_flag_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fps = 8.0").unwrap();

        let config = resolve_config(Some(file.path()), Some(30.0)).unwrap();
        assert!((config.fps - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bad_fps_flag_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(resolve_config(Some(file.path()), Some(0.0)).is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(resolve_config(Some(&missing), None).is_err());
    }

    #[test]
    fn test_cli_parses_demo() {
        let cli = Cli::parse_from(["tline", "--fps", "10", "demo", "--steps", "5"]);
        assert_eq!(cli.fps, Some(10.0));
        assert!(matches!(cli.command, Commands::Demo { steps: 5, .. }));
    }

    #[test]
    fn test_cli_parses_completions() {
        let cli = Cli::parse_from(["tline", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: clap_complete::Shell::Bash
            }
        ));
    }

    #[test]
    fn test_cli_rejects_zero_steps() {
        assert!(Cli::try_parse_from(["tline", "demo", "--steps", "0"]).is_err());
    }
}
