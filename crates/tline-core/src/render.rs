//! Render Context - what a column sees while it paints
//!
//! The status line builds one [`RenderContext`] per column per paint. It
//! bundles the terminal, the line's row, the column span and the colors
//! captured when the line was created. Columns never hold a reference to
//! their status line; everything they need arrives here.
//!
//! Every write is clipped to the column span, so a column cannot paint
//! outside `[left, left + width)` no matter what text it produces.

use crate::Result;
use crate::terminal::{Colors, Terminal};
use std::time::Instant;

/// Per-paint state handed to [`Column::draw`](crate::Column::draw) and
/// [`Column::dispose`](crate::Column::dispose).
pub struct RenderContext<'a> {
    term: &'a mut dyn Terminal,
    top: u16,
    left: u16,
    width: u16,
    cursor: u16,
    original: Colors,
    now: Instant,
    plain: bool,
}

// Every fallible method here only forwards terminal I/O errors
#[allow(clippy::missing_errors_doc)]
impl<'a> RenderContext<'a> {
    /// Context for the span `[left, left + width)` on row `top`.
    ///
    /// The cursor is assumed to already sit at `(left, top)`.
    pub fn new(
        term: &'a mut dyn Terminal,
        top: u16,
        left: u16,
        width: u16,
        original: Colors,
        now: Instant,
    ) -> Self {
        Self {
            term,
            top,
            left,
            width,
            cursor: 0,
            original,
            now,
            plain: false,
        }
    }

    /// Suppress color changes and cursor movement (redirected output).
    #[must_use]
    pub fn plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    /// True when painting into a redirected, non-interactive stream.
    pub fn is_plain(&self) -> bool {
        self.plain
    }

    /// Row the status line occupies.
    pub fn top(&self) -> u16 {
        self.top
    }

    /// First column of the span.
    pub fn left(&self) -> u16 {
        self.left
    }

    /// Width of the span in cells.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Cells of the span not yet written or skipped.
    pub fn remaining(&self) -> u16 {
        self.width - self.cursor
    }

    /// Timestamp of the frame being painted.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Colors in effect when the status line was created.
    pub fn original_colors(&self) -> Colors {
        self.original
    }

    /// Write text at the cursor, dropping whatever does not fit the span.
    pub fn write(&mut self, text: &str) -> Result<()> {
        let room = usize::from(self.remaining());
        if room == 0 {
            return Ok(());
        }
        let clipped: String = text.chars().take(room).collect();
        if clipped.is_empty() {
            return Ok(());
        }
        // `clipped` holds at most `room` chars, which fits in u16
        self.cursor += clipped.chars().count() as u16;
        self.term.write_str(&clipped)
    }

    /// Write a single glyph.
    pub fn write_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write(ch.encode_utf8(&mut buf))
    }

    /// Switch to a color pair.
    pub fn set_colors(&mut self, colors: Colors) -> Result<()> {
        if self.plain {
            return Ok(());
        }
        self.term.set_colors(colors)
    }

    /// Return to the colors captured at construction.
    pub fn restore_colors(&mut self) -> Result<()> {
        let original = self.original;
        self.set_colors(original)
    }

    /// Advance the cursor `cells` cells without painting them.
    pub fn skip(&mut self, cells: u16) -> Result<()> {
        let cells = cells.min(self.remaining());
        if cells == 0 {
            return Ok(());
        }
        self.cursor += cells;
        if self.plain {
            return Ok(());
        }
        self.term
            .move_to(self.left.saturating_add(self.cursor), self.top)
    }

    /// Pad the rest of the span with spaces. Plain output is not padded.
    pub fn fill_remaining(&mut self) -> Result<()> {
        if self.plain {
            return Ok(());
        }
        let pad = " ".repeat(usize::from(self.remaining()));
        self.write(&pad)
    }
}

impl std::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("top", &self.top)
            .field("left", &self.left)
            .field("width", &self.width)
            .field("cursor", &self.cursor)
            .field("plain", &self.plain)
            .finish_non_exhaustive()
    }
}

/// Truncate or pad `text` to exactly `width` characters.
///
/// Keeps the first `min(width, len)` characters and pads with spaces on the
/// right, so a shorter string fully overwrites a longer one painted before.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Format a duration in whole seconds as `HH{sep}MM{sep}SS`.
///
/// Hours are not wrapped at 24.
pub fn format_clock(total_secs: u64, separator: char) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    format!("{hours:02}{separator}{minutes:02}{separator}{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::MemoryTerminal;

    #[test]
    fn test_fit_truncates_long_text() {
        assert_eq!(fit_to_width("hello world", 10), "hello worl");
    }

    #[test]
    fn test_fit_pads_short_text() {
        assert_eq!(fit_to_width("ab", 5), "ab   ");
        assert_eq!(fit_to_width("", 3), "   ");
        assert_eq!(fit_to_width("abc", 0), "");
    }

    #[test]
    fn test_fit_always_returns_exact_width() {
        for text in ["", "a", "exactly10!", "a much longer string than the width"] {
            for width in 0..15 {
                let out = fit_to_width(text, width);
                assert_eq!(out.chars().count(), width);
                let kept: String = text.chars().take(width).collect();
                assert!(out.starts_with(&kept));
                assert!(out[kept.len()..].chars().all(|c| c == ' '));
            }
        }
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0, ':'), "00:00:00");
        assert_eq!(format_clock(3661, ':'), "01:01:01");
        assert_eq!(format_clock(59, ' '), "00 00 59");
        assert_eq!(format_clock(100 * 3600, ':'), "100:00:00");
    }

    #[test]
    fn test_context_clips_to_span() {
        let mut term = MemoryTerminal::new(20);
        let mut handle = term.clone();
        handle.move_to(3, 0).unwrap();
        let mut ctx = RenderContext::new(&mut term, 0, 3, 4, Colors::default(), Instant::now());

        ctx.write("abcdefgh").unwrap();
        ctx.write("more").unwrap();

        assert_eq!(handle.row_text(0), "   abcd             ");
        assert_eq!(ctx.remaining(), 0);
    }

    #[test]
    fn test_skip_then_fill() {
        let mut term = MemoryTerminal::new(10);
        let handle = term.clone();
        let mut ctx = RenderContext::new(&mut term, 0, 0, 6, Colors::default(), Instant::now());

        ctx.write("x").unwrap();
        ctx.skip(2).unwrap();
        ctx.write("y").unwrap();
        ctx.fill_remaining().unwrap();

        assert_eq!(handle.span_text(0, 0, 4), "x  y");
        assert_eq!(ctx.remaining(), 0);
    }
}
