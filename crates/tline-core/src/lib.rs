//! tline - live status lines for command-line tools
//!
//! A [`StatusLine`] owns one terminal row, splits it into columns and keeps
//! them painted from a background thread while the rest of the program
//! reports progress from wherever it likes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │  StatusLine  │  layout, lock, lifecycle, ticker
//! └──────┬───────┘
//!        │ paints through
//!        ▼
//! ┌──────────────┐
//! │    Column    │  Label | Spinner | ProgressBar
//! └──────┬───────┘
//!        │ writes into
//!        ▼
//! ┌──────────────┐
//! │RenderContext │  span clipping, color restore
//! └──────┬───────┘
//!        │ drives
//!        ▼
//! ┌──────────────┐
//! │   Terminal   │  crossterm device or in-memory screen
//! └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use tline_core::{CrosstermTerminal, Label, ProgressBar, StatusLine, StatusLineConfig, Width};
//!
//! # fn main() -> tline_core::Result<()> {
//! let status = StatusLine::new(CrosstermTerminal::stdout(), StatusLineConfig::default())?;
//! let label = Label::new(Width::Fixed(16)).with_content("indexing");
//! let bar = ProgressBar::new(250)?;
//! status.add_column(label.clone())?;
//! status.add_column(bar.clone())?;
//! status.start()?;
//!
//! std::thread::scope(|s| {
//!     s.spawn(|| (0..250).for_each(|_| bar.step()));
//! });
//! label.set_content("indexed");
//! status.dispose()?;
//! # Ok(())
//! # }
//! ```

pub mod column;
pub mod config;
pub mod error;
pub mod render;
pub mod status_line;
pub mod terminal;
pub mod theme;

mod ticker;

pub use column::{Column, Label, ProgressBar, ProgressBarOptions, Spinner, Width};
pub use config::StatusLineConfig;
pub use error::{Error, Result};
pub use render::RenderContext;
pub use status_line::{ColumnSpan, StatusLine};
pub use terminal::{Colors, CrosstermTerminal, MemoryTerminal, Terminal};
pub use theme::{Animations, ProgressTheme, Theme};
