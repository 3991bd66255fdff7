//! Columns - the widgets a status line is made of
//!
//! Every column occupies a horizontal span of the line and knows how to
//! paint itself into a [`RenderContext`]. The set of variants is closed:
//!
//! - [`Label`] - static or slowly changing text
//! - [`Spinner`] - single glyph that animates on every pass
//! - [`ProgressBar`] - bracketed bar with percentage and time readout
//!
//! Each variant is a cheap handle around shared state. Keep a clone after
//! adding it to a [`StatusLine`](crate::StatusLine) and mutate it from any
//! thread; the redraw thread picks the change up on its next pass.

mod label;
mod progress;
mod spinner;

pub use label::Label;
pub use progress::{
    MAX_DECIMAL_PLACES, ProgressBar, ProgressBarOptions, READOUT_WIDTH, REPORT_THRESHOLD,
};
pub use spinner::Spinner;

use crate::Result;
use crate::render::RenderContext;

/// How much of the line a column claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Exactly this many cells.
    Fixed(u16),
    /// Everything from the column's left edge to the right edge of the buffer.
    Fill,
}

impl Width {
    /// Resolve to a cell count for a column starting at `left`.
    ///
    /// Fixed widths are clamped so the span never runs past the buffer.
    pub fn resolve(self, left: u16, buffer_width: u16) -> u16 {
        let available = buffer_width.saturating_sub(left);
        match self {
            Self::Fixed(cells) => cells.min(available),
            Self::Fill => available,
        }
    }
}

/// A widget registered on a status line.
#[derive(Debug, Clone)]
pub enum Column {
    /// Text field.
    Label(Label),
    /// Animated glyph.
    Spinner(Spinner),
    /// Progress bar with readout.
    ProgressBar(ProgressBar),
}

impl Column {
    /// Span the column asks for.
    pub fn width(&self) -> Width {
        match self {
            Self::Label(label) => label.width(),
            Self::Spinner(_) => Width::Fixed(1),
            Self::ProgressBar(bar) => Width::Fixed(bar.total_width()),
        }
    }

    /// Sizing hint; not authoritative.
    pub fn desired_width(&self) -> u16 {
        match self {
            Self::Label(label) => label.desired_width(),
            Self::Spinner(_) => 1,
            Self::ProgressBar(bar) => bar.total_width(),
        }
    }

    /// Whether the column has something new to paint.
    ///
    /// Animated variants are always dirty.
    pub fn is_dirty(&self) -> bool {
        match self {
            Self::Label(label) => label.is_dirty(),
            Self::Spinner(_) | Self::ProgressBar(_) => true,
        }
    }

    /// Paint the current state. The cursor sits at the column's left edge.
    ///
    /// # Errors
    ///
    /// Propagates terminal write failures.
    pub fn draw(&self, ctx: &mut RenderContext<'_>) -> Result<()> {
        match self {
            Self::Label(label) => label.draw(ctx),
            Self::Spinner(spinner) => spinner.draw(ctx),
            Self::ProgressBar(bar) => bar.draw(ctx),
        }
    }

    /// Final paint when the status line is torn down.
    ///
    /// Labels keep their last text on screen. On redirected output nothing
    /// was painted before, so they write it once here.
    ///
    /// # Errors
    ///
    /// Propagates terminal write failures.
    pub fn dispose(&self, ctx: &mut RenderContext<'_>) -> Result<()> {
        match self {
            Self::Label(label) if ctx.is_plain() => label.draw(ctx),
            Self::Label(_) => Ok(()),
            Self::Spinner(spinner) => spinner.dispose(ctx),
            Self::ProgressBar(bar) => bar.dispose(ctx),
        }
    }
}

impl From<Label> for Column {
    fn from(label: Label) -> Self {
        Self::Label(label)
    }
}

impl From<Spinner> for Column {
    fn from(spinner: Spinner) -> Self {
        Self::Spinner(spinner)
    }
}

impl From<ProgressBar> for Column {
    fn from(bar: ProgressBar) -> Self {
        Self::ProgressBar(bar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_clamps_to_buffer() {
        assert_eq!(Width::Fixed(10).resolve(1, 80), 10);
        assert_eq!(Width::Fixed(10).resolve(75, 80), 5);
        assert_eq!(Width::Fixed(10).resolve(90, 80), 0);
    }

    #[test]
    fn test_fill_takes_the_rest() {
        assert_eq!(Width::Fill.resolve(20, 80), 60);
        assert_eq!(Width::Fill.resolve(80, 80), 0);
    }

    #[test]
    fn test_column_widths() {
        let spinner: Column = Spinner::new().into();
        assert_eq!(spinner.width(), Width::Fixed(1));
        assert!(spinner.is_dirty());

        let bar: Column = ProgressBar::new(10).unwrap().into();
        assert_eq!(bar.width(), Width::Fixed(32 + READOUT_WIDTH));

        let label: Column = Label::new(Width::Fill).into();
        assert_eq!(label.width(), Width::Fill);
        assert_eq!(label.desired_width(), 32);
    }
}
