//! In-memory terminal
//!
//! A virtual screen that records every painted cell with its colors.
//! Clones share the same screen, so a test can hand one clone to a
//! [`StatusLine`](crate::StatusLine) and inspect the other.

use super::{Colors, Terminal};
use crate::Result;
use crossterm::style::Color;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One painted character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Glyph in the cell.
    pub ch: char,
    /// Colors the glyph was painted with.
    pub colors: Colors,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            colors: Colors::default(),
        }
    }
}

#[derive(Debug)]
struct Screen {
    width: u16,
    rows: Vec<Vec<Cell>>,
    cursor: (u16, u16),
    colors: Colors,
    redirected: bool,
    cursor_visible: bool,
    writes: usize,
    overflow: usize,
}

impl Screen {
    fn row_mut(&mut self, row: u16) -> &mut Vec<Cell> {
        let row = usize::from(row);
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let width = usize::from(self.width);
        let cells = &mut self.rows[row];
        if cells.len() < width {
            cells.resize(width, Cell::default());
        }
        cells
    }

    fn put(&mut self, ch: char) {
        let (col, row) = self.cursor;
        if col < self.width {
            let colors = self.colors;
            self.row_mut(row)[usize::from(col)] = Cell { ch, colors };
        } else {
            self.overflow += 1;
        }
        self.cursor.0 = col.saturating_add(1);
    }
}

/// A cloneable virtual screen implementing [`Terminal`].
#[derive(Debug, Clone)]
pub struct MemoryTerminal {
    screen: Arc<Mutex<Screen>>,
}

impl MemoryTerminal {
    /// Interactive screen of the given width, cursor at the origin.
    pub fn new(width: u16) -> Self {
        Self {
            screen: Arc::new(Mutex::new(Screen {
                width,
                rows: Vec::new(),
                cursor: (0, 0),
                colors: Colors::default(),
                redirected: false,
                cursor_visible: true,
                writes: 0,
                overflow: 0,
            })),
        }
    }

    /// Screen that reports itself as redirected output.
    pub fn redirected(width: u16) -> Self {
        let term = Self::new(width);
        term.screen().redirected = true;
        term
    }

    /// Place the cursor before handing the terminal out.
    #[must_use]
    pub fn with_cursor(self, col: u16, row: u16) -> Self {
        self.screen().cursor = (col, row);
        self
    }

    /// Start with the given colors in effect.
    #[must_use]
    pub fn with_colors(self, colors: Colors) -> Self {
        self.screen().colors = colors;
        self
    }

    fn screen(&self) -> MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Text of a row, exactly `width` characters long.
    pub fn row_text(&self, row: u16) -> String {
        let mut screen = self.screen();
        screen.row_mut(row).iter().map(|cell| cell.ch).collect()
    }

    /// Text of the cells `[left, left + len)` on a row.
    pub fn span_text(&self, row: u16, left: u16, len: u16) -> String {
        self.row_text(row)
            .chars()
            .skip(usize::from(left))
            .take(usize::from(len))
            .collect()
    }

    /// A single cell, if it lies on the screen.
    pub fn cell(&self, col: u16, row: u16) -> Option<Cell> {
        let mut screen = self.screen();
        if col >= screen.width {
            return None;
        }
        Some(screen.row_mut(row)[usize::from(col)])
    }

    /// Current cursor position.
    pub fn cursor(&self) -> (u16, u16) {
        self.screen().cursor
    }

    /// Number of output-producing calls (`write_str`, `newline`) so far.
    pub fn writes(&self) -> usize {
        self.screen().writes
    }

    /// Characters written past the right edge of the screen.
    pub fn overflow(&self) -> usize {
        self.screen().overflow
    }

    /// Whether the cursor is currently shown.
    pub fn cursor_visible(&self) -> bool {
        self.screen().cursor_visible
    }
}

impl Terminal for MemoryTerminal {
    fn cursor_position(&mut self) -> Result<(u16, u16)> {
        Ok(self.screen().cursor)
    }

    fn move_to(&mut self, col: u16, row: u16) -> Result<()> {
        self.screen().cursor = (col, row);
        Ok(())
    }

    fn colors(&self) -> Colors {
        self.screen().colors
    }

    fn set_foreground(&mut self, color: Color) -> Result<()> {
        self.screen().colors.foreground = color;
        Ok(())
    }

    fn set_background(&mut self, color: Color) -> Result<()> {
        self.screen().colors.background = color;
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        let mut screen = self.screen();
        screen.writes += 1;
        for ch in text.chars() {
            screen.put(ch);
        }
        Ok(())
    }

    fn newline(&mut self) -> Result<()> {
        let mut screen = self.screen();
        screen.writes += 1;
        let row = screen.cursor.1.saturating_add(1);
        screen.cursor = (0, row);
        // Materialize the row so it exists like a scrolled-in terminal line
        screen.row_mut(row);
        Ok(())
    }

    fn buffer_width(&self) -> Result<u16> {
        Ok(self.screen().width)
    }

    fn is_redirected(&self) -> bool {
        self.screen().redirected
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.screen().cursor_visible = false;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.screen().cursor_visible = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_paints_cells_with_colors() {
        let mut term = MemoryTerminal::new(10);
        term.move_to(2, 1).unwrap();
        term.set_foreground(Color::Red).unwrap();
        term.write_str("ab").unwrap();

        assert_eq!(term.row_text(1), "  ab      ");
        assert_eq!(term.cell(2, 1).unwrap().colors.foreground, Color::Red);
        assert_eq!(term.cursor(), (4, 1));
    }

    #[test]
    fn test_overflow_is_counted_not_painted() {
        let mut term = MemoryTerminal::new(4);
        term.move_to(2, 0).unwrap();
        term.write_str("xyz").unwrap();

        assert_eq!(term.row_text(0), "  xy");
        assert_eq!(term.overflow(), 1);
    }

    #[test]
    fn test_clones_share_the_screen() {
        let term = MemoryTerminal::new(5);
        let mut handle = term.clone();
        handle.write_str("hi").unwrap();
        assert_eq!(term.span_text(0, 0, 2), "hi");
        assert_eq!(term.writes(), 1);
    }
}
