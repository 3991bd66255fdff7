//! Theme - Colors and glyphs for the built-in columns
//!
//! Centralizing these keeps every widget on the same palette and lets a
//! host restyle the whole line in one place.

use crate::terminal::Colors;
use crossterm::style::Color;

/// Default theme for a status line.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Label text colors.
    pub label: Colors,
    /// Progress bar palette and glyphs.
    pub progress: ProgressTheme,
    /// Spinner animation frames.
    pub spinner: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            label: Colors::new(Color::DarkGrey, Color::Black),
            progress: ProgressTheme::default(),
            spinner: Animations::BLINK,
        }
    }
}

/// Built-in spinner frame sets.
#[derive(Debug, Clone, Copy)]
pub struct Animations;

impl Animations {
    /// Shaded pulse, eight frames.
    pub const BLINK: &'static str = " ░▒▓█▓▒░";
    /// Classic rotating bar.
    pub const LINE: &'static str = "|/-\\";
    /// Braille dots.
    pub const DOTS: &'static str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
}

/// Palette and glyphs for [`ProgressBar`](crate::ProgressBar).
#[derive(Debug, Clone)]
pub struct ProgressTheme {
    /// Cells left of the fill boundary.
    pub fill: Colors,
    /// Cells right of the fill boundary.
    pub rest: Colors,
    /// Border glyph color.
    pub border: Color,
    /// Color of the completion marker.
    pub done: Color,
    /// Glyph opening the bar.
    pub left_border: char,
    /// Glyph closing the bar.
    pub right_border: char,
    /// Pulse shown while progress is too low for an estimate.
    pub pulse: &'static str,
}

impl Default for ProgressTheme {
    fn default() -> Self {
        Self {
            fill: Colors::new(Color::Black, Color::White),
            rest: Colors::new(Color::White, Color::Black),
            border: Color::DarkGrey,
            done: Color::Green,
            left_border: '├',
            right_border: '┤',
            pulse: Animations::BLINK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_defaults() {
        let theme = Theme::default();
        assert_eq!(theme.progress.left_border, '├');
        assert_eq!(theme.progress.right_border, '┤');
        assert_eq!(theme.label.foreground, Color::DarkGrey);
    }

    #[test]
    fn test_pulse_has_eight_frames() {
        assert_eq!(Animations::BLINK.chars().count(), 8);
        assert_eq!(ProgressTheme::default().pulse.chars().count(), 8);
    }
}
