//! Status line configuration
//!
//! Loaded from TOML by hosts, or built in code:
//!
//! ```toml
//! fps = 24.0
//! hide_cursor = false
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default repaint rate.
pub const DEFAULT_FPS: f64 = 16.0;

/// Slowest accepted repaint rate: one frame every ten seconds.
pub const MIN_FPS: f64 = 0.1;

/// Fastest accepted repaint rate: one frame per millisecond.
pub const MAX_FPS: f64 = 1000.0;

/// Settings for a [`StatusLine`](crate::StatusLine).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusLineConfig {
    /// Repaints per second.
    pub fps: f64,
    /// Hide the terminal cursor while the line is live.
    pub hide_cursor: bool,
}

impl Default for StatusLineConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            hide_cursor: true,
        }
    }
}

impl StatusLineConfig {
    /// Read and validate a TOML file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, [`Error::Config`] if it is
    /// not valid TOML for this struct, or [`Error::InvalidConfiguration`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `fps` lies within
    /// [`MIN_FPS`]..=[`MAX_FPS`].
    pub fn validate(&self) -> Result<()> {
        validate_fps(self.fps)
    }

    /// Delay between two repaints.
    pub fn interval(&self) -> Duration {
        interval_for(self.fps)
    }
}

pub(crate) fn validate_fps(fps: f64) -> Result<()> {
    // NaN fails the range check too
    if !(MIN_FPS..=MAX_FPS).contains(&fps) {
        return Err(Error::invalid(format!(
            "fps must be between {MIN_FPS} and {MAX_FPS}, got {fps}"
        )));
    }
    Ok(())
}

/// Interval for `fps`, clamped to the accepted range so unvalidated input
/// never yields a zero or unrepresentable duration.
pub(crate) fn interval_for(fps: f64) -> Duration {
    let fps = if fps.is_nan() {
        DEFAULT_FPS
    } else {
        fps.clamp(MIN_FPS, MAX_FPS)
    };
    Duration::from_secs_f64(1.0 / fps)
}
