//! Spinner column

use crate::render::RenderContext;
use crate::theme::Theme;
use crate::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
struct SpinnerState {
    frames: Vec<char>,
    index: AtomicUsize,
}

/// A one-cell animation that advances a frame on every paint.
#[derive(Debug, Clone)]
pub struct Spinner {
    inner: Arc<SpinnerState>,
}

impl Spinner {
    /// Spinner using the default theme's frames.
    pub fn new() -> Self {
        Self::themed(&Theme::default())
    }

    /// Spinner using `theme.spinner`, falling back to the default frames
    /// if that string is empty.
    pub fn themed(theme: &Theme) -> Self {
        let frames: Vec<char> = theme.spinner.chars().collect();
        if frames.is_empty() {
            return Self::new();
        }
        Self::from_frames(frames)
    }

    /// Spinner cycling through the characters of `frames`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `frames` is empty.
    pub fn with_frames(frames: &str) -> Result<Self> {
        let frames: Vec<char> = frames.chars().collect();
        if frames.is_empty() {
            return Err(Error::invalid("spinner needs at least one frame"));
        }
        Ok(Self::from_frames(frames))
    }

    fn from_frames(frames: Vec<char>) -> Self {
        Self {
            inner: Arc::new(SpinnerState {
                frames,
                index: AtomicUsize::new(0),
            }),
        }
    }

    /// Number of frames painted so far.
    pub fn frame(&self) -> usize {
        self.inner.index.load(Ordering::Relaxed)
    }

    pub(crate) fn draw(&self, ctx: &mut RenderContext<'_>) -> Result<()> {
        let frames = &self.inner.frames;
        let index = self.inner.index.fetch_add(1, Ordering::Relaxed);
        ctx.write_char(frames[index % frames.len()])
    }

    pub(crate) fn dispose(&self, ctx: &mut RenderContext<'_>) -> Result<()> {
        ctx.fill_remaining()
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{Colors, MemoryTerminal, Terminal};
    use std::time::Instant;

    fn paint(spinner: &Spinner, term: &mut MemoryTerminal) -> char {
        term.move_to(0, 0).unwrap();
        let mut ctx = RenderContext::new(term, 0, 0, 1, Colors::default(), Instant::now());
        spinner.draw(&mut ctx).unwrap();
        term.cell(0, 0).unwrap().ch
    }

    #[test]
    fn test_every_draw_advances() {
        let mut term = MemoryTerminal::new(4);
        let spinner = Spinner::with_frames("ab").unwrap();

        assert_eq!(paint(&spinner, &mut term), 'a');
        assert_eq!(paint(&spinner, &mut term), 'b');
        assert_eq!(paint(&spinner, &mut term), 'a');
        assert_eq!(spinner.frame(), 3);
    }

    #[test]
    fn test_consecutive_draws_differ() {
        let mut term = MemoryTerminal::new(4);
        let spinner = Spinner::new();
        let first = paint(&spinner, &mut term);
        let second = paint(&spinner, &mut term);
        assert_ne!(first, second);
    }

    #[test]
    fn test_themed_frames() {
        let theme = Theme {
            spinner: crate::theme::Animations::LINE,
            ..Theme::default()
        };
        let mut term = MemoryTerminal::new(4);
        let spinner = Spinner::themed(&theme);
        assert_eq!(paint(&spinner, &mut term), '|');
        assert_eq!(paint(&spinner, &mut term), '/');

        let blank = Theme {
            spinner: "",
            ..Theme::default()
        };
        assert_eq!(paint(&Spinner::themed(&blank), &mut term), ' ');
    }

    #[test]
    fn test_empty_frames_rejected() {
        assert!(matches!(
            Spinner::with_frames(""),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_dispose_blanks_glyph() {
        let mut term = MemoryTerminal::new(4);
        let spinner = Spinner::with_frames("*").unwrap();
        paint(&spinner, &mut term);

        term.move_to(0, 0).unwrap();
        let mut ctx = RenderContext::new(&mut term, 0, 0, 1, Colors::default(), Instant::now());
        spinner.dispose(&mut ctx).unwrap();
        assert_eq!(term.cell(0, 0).unwrap().ch, ' ');
    }
}
