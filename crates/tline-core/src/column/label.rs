//! Label column

use super::Width;
use crate::Result;
use crate::render::{RenderContext, fit_to_width};
use crate::terminal::Colors;
use crate::theme::Theme;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

const DEFAULT_DESIRED_WIDTH: u16 = 32;

#[derive(Debug)]
struct LabelState {
    width: Width,
    colors: Colors,
    content: Mutex<String>,
    dirty: AtomicBool,
}

/// A text field that repaints only when its content changes.
///
/// Text longer than the span is cut; shorter text is padded with spaces so
/// nothing from a previous paint survives.
#[derive(Debug, Clone)]
pub struct Label {
    inner: Arc<LabelState>,
}

impl Label {
    /// Empty label in the default theme colors.
    pub fn new(width: Width) -> Self {
        Self::themed(width, &Theme::default())
    }

    /// Empty label in `theme.label` colors.
    pub fn themed(width: Width, theme: &Theme) -> Self {
        Self::styled(width, theme.label)
    }

    /// Empty label painted with `colors`.
    pub fn styled(width: Width, colors: Colors) -> Self {
        Self {
            inner: Arc::new(LabelState {
                width,
                colors,
                content: Mutex::new(String::new()),
                // Clear the span on the first pass even before any text arrives
                dirty: AtomicBool::new(true),
            }),
        }
    }

    /// Set the initial content.
    #[must_use]
    pub fn with_content(self, content: impl Into<String>) -> Self {
        self.set_content(content);
        self
    }

    /// Replace the text. A no-op when the text is unchanged.
    pub fn set_content(&self, content: impl Into<String>) {
        let content = content.into();
        let mut current = self
            .inner
            .content
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *current == content {
            return;
        }
        *current = content;
        self.inner.dirty.store(true, Ordering::Release);
    }

    /// Current text.
    pub fn content(&self) -> String {
        self.inner
            .content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Span this label asks for.
    pub fn width(&self) -> Width {
        self.inner.width
    }

    /// Sizing hint.
    pub fn desired_width(&self) -> u16 {
        match self.inner.width {
            Width::Fixed(cells) => cells,
            Width::Fill => DEFAULT_DESIRED_WIDTH,
        }
    }

    /// Whether the text changed since the last paint.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.load(Ordering::Acquire)
    }

    pub(crate) fn draw(&self, ctx: &mut RenderContext<'_>) -> Result<()> {
        // Clear first so a concurrent set_content is never lost
        self.inner.dirty.store(false, Ordering::Release);
        let text = fit_to_width(&self.content(), usize::from(ctx.width()));

        ctx.set_colors(self.inner.colors)?;
        ctx.write(&text)?;
        ctx.restore_colors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{MemoryTerminal, Terminal};
    use std::time::Instant;

    fn paint(label: &Label, term: &mut MemoryTerminal, width: u16) {
        let mut ctx = RenderContext::new(term, 0, 0, width, Colors::default(), Instant::now());
        label.draw(&mut ctx).unwrap();
    }

    #[test]
    fn test_long_content_is_truncated() {
        let mut term = MemoryTerminal::new(20);
        let label = Label::new(Width::Fixed(10)).with_content("hello world");
        paint(&label, &mut term, 10);

        assert_eq!(term.span_text(0, 0, 10), "hello worl");
        assert_eq!(term.overflow(), 0);
        assert_eq!(term.cursor(), (10, 0));
    }

    #[test]
    fn test_short_content_overwrites_previous() {
        let mut term = MemoryTerminal::new(20);
        let label = Label::new(Width::Fixed(8)).with_content("previous");
        paint(&label, &mut term, 8);

        label.set_content("new");
        term.move_to(0, 0).unwrap();
        paint(&label, &mut term, 8);

        assert_eq!(term.span_text(0, 0, 8), "new     ");
    }

    #[test]
    fn test_same_content_does_not_dirty() {
        let mut term = MemoryTerminal::new(20);
        let label = Label::new(Width::Fixed(5)).with_content("same");
        paint(&label, &mut term, 5);
        assert!(!label.is_dirty());

        label.set_content("same");
        assert!(!label.is_dirty());

        label.set_content("other");
        assert!(label.is_dirty());
    }

    #[test]
    fn test_draw_is_idempotent() {
        let mut term = MemoryTerminal::new(20);
        let label = Label::new(Width::Fixed(6)).with_content("stable");

        paint(&label, &mut term, 6);
        let first = term.row_text(0);
        term.move_to(0, 0).unwrap();
        paint(&label, &mut term, 6);

        assert_eq!(term.row_text(0), first);
    }

    #[test]
    fn test_colors_restored_after_draw() {
        let mut term = MemoryTerminal::new(20);
        let label = Label::new(Width::Fixed(3)).with_content("abc");
        paint(&label, &mut term, 3);

        assert_eq!(term.cell(0, 0).unwrap().colors, Theme::default().label);
        assert_eq!(term.colors(), Colors::default());
    }
}
