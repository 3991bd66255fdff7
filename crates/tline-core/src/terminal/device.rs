//! Crossterm-backed terminal
//!
//! Commands are queued into the writer and only reach the device on
//! [`Terminal::flush`], so a whole redraw pass lands as one write.

use super::{Colors, Terminal};
use crate::Result;
use crossterm::{
    QueueableCommand, cursor,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use std::io::{IsTerminal, Stdout, Write};

/// Width reported when the device cannot be queried.
const FALLBACK_WIDTH: u16 = 80;

/// A [`Terminal`] that emits crossterm escape sequences into a writer.
pub struct CrosstermTerminal<W: Write + Send> {
    out: W,
    colors: Colors,
    redirected: bool,
}

impl CrosstermTerminal<Stdout> {
    /// Terminal bound to the process stdout.
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let redirected = !out.is_terminal();
        Self::with_writer(out, redirected)
    }
}

impl<W: Write + Send> CrosstermTerminal<W> {
    /// Wrap an arbitrary writer.
    ///
    /// `redirected` controls whether the status line animates at all.
    pub fn with_writer(out: W, redirected: bool) -> Self {
        Self {
            out,
            colors: Colors::default(),
            redirected,
        }
    }

    /// Consume the terminal and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> std::fmt::Debug for CrosstermTerminal<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrosstermTerminal")
            .field("colors", &self.colors)
            .field("redirected", &self.redirected)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send> Terminal for CrosstermTerminal<W> {
    fn cursor_position(&mut self) -> Result<(u16, u16)> {
        if self.redirected {
            return Ok((0, 0));
        }
        // Pending output would shift the reported position
        self.out.flush()?;
        Ok(cursor::position()?)
    }

    fn move_to(&mut self, col: u16, row: u16) -> Result<()> {
        self.out.queue(cursor::MoveTo(col, row))?;
        Ok(())
    }

    fn colors(&self) -> Colors {
        self.colors
    }

    fn set_foreground(&mut self, color: Color) -> Result<()> {
        if self.colors.foreground != color {
            self.out.queue(SetForegroundColor(color))?;
            self.colors.foreground = color;
        }
        Ok(())
    }

    fn set_background(&mut self, color: Color) -> Result<()> {
        if self.colors.background != color {
            self.out.queue(SetBackgroundColor(color))?;
            self.colors.background = color;
        }
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn newline(&mut self) -> Result<()> {
        writeln!(self.out)?;
        Ok(())
    }

    fn buffer_width(&self) -> Result<u16> {
        if self.redirected {
            return Ok(FALLBACK_WIDTH);
        }
        Ok(terminal::size().map_or(FALLBACK_WIDTH, |(cols, _)| cols))
    }

    fn is_redirected(&self) -> bool {
        self.redirected
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.out.queue(cursor::Hide)?;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.out.queue(cursor::Show)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_changes_are_deduplicated() {
        let mut term = CrosstermTerminal::with_writer(Vec::new(), false);
        term.set_foreground(Color::Red).unwrap();
        let after_first = term.out.len();
        term.set_foreground(Color::Red).unwrap();
        assert_eq!(term.out.len(), after_first);
        assert_eq!(term.colors().foreground, Color::Red);
    }

    #[test]
    fn test_write_queues_text() {
        let mut term = CrosstermTerminal::with_writer(Vec::new(), true);
        term.write_str("hello").unwrap();
        term.flush().unwrap();
        let out = String::from_utf8(term.into_inner()).unwrap();
        assert!(out.contains("hello"));
    }

    #[test]
    fn test_redirected_width_falls_back() {
        let term = CrosstermTerminal::with_writer(Vec::new(), true);
        assert_eq!(term.buffer_width().unwrap(), FALLBACK_WIDTH);
        assert!(term.is_redirected());
    }
}
