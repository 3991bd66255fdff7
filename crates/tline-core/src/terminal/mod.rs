//! Terminal Surface - the capability set the engine paints through
//!
//! The status line never talks to stdout directly. Everything goes through
//! [`Terminal`], which has two implementations:
//!
//! - [`CrosstermTerminal`] - a real device, commands queued and flushed per frame
//! - [`MemoryTerminal`] - a virtual screen used by tests and headless hosts

mod device;
mod memory;

pub use self::device::CrosstermTerminal;
pub use self::memory::{Cell, MemoryTerminal};

use crate::Result;
use crossterm::style::Color;

/// A foreground/background color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    /// Text color.
    pub foreground: Color,
    /// Cell background color.
    pub background: Color,
}

impl Colors {
    /// Create a color pair.
    pub const fn new(foreground: Color, background: Color) -> Self {
        Self {
            foreground,
            background,
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self::new(Color::Reset, Color::Reset)
    }
}

/// Cursor, color and output primitives consumed by the status line.
///
/// Coordinates are zero-based `(column, row)`. Writes advance the cursor
/// by one cell per `char`.
///
/// # Errors
///
/// Fallible methods fail with [`Error::Io`](crate::Error::Io) when the
/// device rejects the operation.
#[allow(clippy::missing_errors_doc)]
pub trait Terminal: Send {
    /// Current cursor position as `(column, row)`.
    fn cursor_position(&mut self) -> Result<(u16, u16)>;

    /// Move the cursor to `(col, row)`.
    fn move_to(&mut self, col: u16, row: u16) -> Result<()>;

    /// Colors currently in effect.
    fn colors(&self) -> Colors;

    /// Change the foreground color.
    fn set_foreground(&mut self, color: Color) -> Result<()>;

    /// Change the background color.
    fn set_background(&mut self, color: Color) -> Result<()>;

    /// Write text at the cursor, advancing it.
    fn write_str(&mut self, text: &str) -> Result<()>;

    /// Move to the start of the next line.
    fn newline(&mut self) -> Result<()>;

    /// Total number of columns available.
    fn buffer_width(&self) -> Result<u16>;

    /// True when output is not an interactive terminal.
    fn is_redirected(&self) -> bool;

    /// Hide the cursor while the line is animating.
    fn hide_cursor(&mut self) -> Result<()>;

    /// Show the cursor again.
    fn show_cursor(&mut self) -> Result<()>;

    /// Push queued output to the device.
    fn flush(&mut self) -> Result<()>;

    /// Apply both colors of a pair.
    fn set_colors(&mut self, colors: Colors) -> Result<()> {
        self.set_foreground(colors.foreground)?;
        self.set_background(colors.background)
    }
}
