//! Progress Bar column
//!
//! Layout of the span, for a bar width of `W`:
//!
//! ```text
//! ├      42%                 ┤ 00:01:13
//! │<--- interior (W - 2) --->│<- readout (9) ->
//! ```
//!
//! The percentage is centered inside the bar. Cells left of the fill
//! boundary use the fill colors and the rest use the background colors,
//! so the same cells show both the boundary and the text.
//!
//! The readout shows the estimated time left once progress passes
//! [`REPORT_THRESHOLD`]. Below that the estimate is too noisy, so a pulse
//! glyph is shown instead.
//!
//! # Thread safety
//!
//! [`ProgressBar::step`] and [`ProgressBar::reset`] only touch atomics and
//! may be called from any thread. The redraw thread reads a snapshot of
//! them inside its own exclusive window.

use crate::render::{RenderContext, fit_to_width, format_clock};
use crate::terminal::Colors;
use crate::theme::{ProgressTheme, Theme};
use crate::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Cells reserved after the bar for the time readout.
pub const READOUT_WIDTH: u16 = 9;

/// Progress fraction below which no time estimate is shown.
pub const REPORT_THRESHOLD: f64 = 0.05;

/// Most decimal places the percentage can show.
pub const MAX_DECIMAL_PLACES: u8 = 4;

const DEFAULT_BAR_WIDTH: u16 = 32;
const MIN_BAR_WIDTH: u16 = 3;
const PERCENT_TEXT_WIDTH: u16 = 4;
// Bit pattern of a NaN, never produced by a clamped fraction
const NO_FRACTION: u64 = u64::MAX;

/// Construction options for [`ProgressBar`].
#[derive(Debug, Clone)]
pub struct ProgressBarOptions {
    /// Bar width including both border glyphs.
    pub bar_width: u16,
    /// Paint the percentage inside the bar.
    pub show_percentage: bool,
    /// Digits after the decimal point in the percentage, `0` for whole
    /// percents. At most [`MAX_DECIMAL_PLACES`].
    pub decimal_places: u8,
    /// Show the time readout after the bar.
    pub show_readout: bool,
    /// Colors and glyphs.
    pub theme: ProgressTheme,
}

impl Default for ProgressBarOptions {
    fn default() -> Self {
        Self::themed(&Theme::default())
    }
}

impl ProgressBarOptions {
    /// Default options painted with `theme.progress`.
    pub fn themed(theme: &Theme) -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
            show_percentage: true,
            decimal_places: 0,
            show_readout: true,
            theme: theme.progress.clone(),
        }
    }
}

#[derive(Debug)]
struct ProgressState {
    options: ProgressBarOptions,
    pulse: Vec<char>,
    value: AtomicU64,
    max_value: AtomicU64,
    // f64 bits of the last `report`, or NO_FRACTION while counting
    fraction: AtomicU64,
    // Timestamps are nanoseconds since `origin`
    origin: Instant,
    started_at: AtomicU64,
    reported_at: AtomicU64,
    // Touched only by the redraw thread
    last_percent: AtomicI64,
    frame: AtomicUsize,
}

/// A consistent read of the counters.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    value: u64,
    max_value: u64,
    fraction: Option<f64>,
    started: Instant,
    reported: Instant,
}

impl Snapshot {
    /// Fraction complete, clamped to `[0, 1]`.
    fn progress(&self) -> f64 {
        if let Some(fraction) = self.fraction {
            return fraction;
        }
        if self.max_value == 0 {
            return 0.0;
        }
        (self.value as f64 / self.max_value as f64).clamp(0.0, 1.0)
    }
}

/// A bracketed progress bar with a centered percentage and a time readout.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    inner: Arc<ProgressState>,
}

impl ProgressBar {
    /// Bar counting up to `max_value` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `max_value` is zero.
    pub fn new(max_value: u64) -> Result<Self> {
        Self::with_options(max_value, ProgressBarOptions::default())
    }

    /// Bar counting up to `max_value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `max_value` is zero, the
    /// bar is narrower than its two borders plus one cell, or the pulse
    /// animation has no frames.
    pub fn with_options(max_value: u64, options: ProgressBarOptions) -> Result<Self> {
        if max_value == 0 {
            return Err(Error::invalid("progress bar max value must be positive"));
        }
        if options.bar_width < MIN_BAR_WIDTH {
            return Err(Error::invalid(format!(
                "progress bar width must be at least {MIN_BAR_WIDTH}, got {}",
                options.bar_width
            )));
        }
        if options.bar_width > u16::MAX - READOUT_WIDTH {
            return Err(Error::invalid("progress bar width too large"));
        }
        if options.decimal_places > MAX_DECIMAL_PLACES {
            return Err(Error::invalid(format!(
                "progress bar shows at most {MAX_DECIMAL_PLACES} decimal places, got {}",
                options.decimal_places
            )));
        }
        let pulse: Vec<char> = options.theme.pulse.chars().collect();
        if pulse.is_empty() {
            return Err(Error::invalid("progress pulse needs at least one frame"));
        }

        Ok(Self {
            inner: Arc::new(ProgressState {
                options,
                pulse,
                value: AtomicU64::new(0),
                max_value: AtomicU64::new(max_value),
                fraction: AtomicU64::new(NO_FRACTION),
                origin: Instant::now(),
                started_at: AtomicU64::new(0),
                reported_at: AtomicU64::new(0),
                last_percent: AtomicI64::new(-1),
                frame: AtomicUsize::new(0),
            }),
        })
    }

    /// Count one unit of work.
    pub fn step(&self) {
        self.inner.fraction.store(NO_FRACTION, Ordering::Release);
        self.inner.value.fetch_add(1, Ordering::AcqRel);
        self.inner
            .reported_at
            .store(self.nanos_since_origin(), Ordering::Release);
    }

    /// Jump to an absolute value.
    pub fn set_value(&self, value: u64) {
        self.inner.fraction.store(NO_FRACTION, Ordering::Release);
        self.inner.value.store(value, Ordering::Release);
        self.inner
            .reported_at
            .store(self.nanos_since_origin(), Ordering::Release);
    }

    /// Back to zero, restarting the elapsed-time baseline.
    pub fn reset(&self) {
        let now = self.nanos_since_origin();
        self.inner.started_at.store(now, Ordering::Release);
        self.inner.fraction.store(NO_FRACTION, Ordering::Release);
        self.inner.value.store(0, Ordering::Release);
        self.inner.reported_at.store(now, Ordering::Release);
    }

    /// Report progress as a fraction of the whole.
    ///
    /// The value is clamped to `[0, 1]`; NaN counts as zero. The bar shows
    /// this fraction instead of `value / max_value` until the next
    /// [`step`](Self::step), [`set_value`](Self::set_value) or
    /// [`reset`](Self::reset).
    pub fn report(&self, fraction: f64) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.inner
            .fraction
            .store(fraction.to_bits(), Ordering::Release);
        self.inner
            .reported_at
            .store(self.nanos_since_origin(), Ordering::Release);
    }

    /// Change the total.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `max_value` is zero.
    pub fn set_max_value(&self, max_value: u64) -> Result<()> {
        if max_value == 0 {
            return Err(Error::invalid("progress bar max value must be positive"));
        }
        self.inner.max_value.store(max_value, Ordering::Release);
        Ok(())
    }

    /// Units counted so far.
    pub fn value(&self) -> u64 {
        self.inner.value.load(Ordering::Acquire)
    }

    /// Current total.
    pub fn max_value(&self) -> u64 {
        self.inner.max_value.load(Ordering::Acquire)
    }

    /// Fraction complete in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.snapshot().progress()
    }

    /// Width of the bar itself, borders included.
    pub fn bar_width(&self) -> u16 {
        self.inner.options.bar_width
    }

    /// Cells between the two borders.
    pub fn interior_width(&self) -> u16 {
        self.bar_width() - 2
    }

    /// Width of the whole column: bar plus readout.
    pub fn total_width(&self) -> u16 {
        if self.inner.options.show_readout {
            self.bar_width() + READOUT_WIDTH
        } else {
            self.bar_width()
        }
    }

    fn nanos_since_origin(&self) -> u64 {
        u64::try_from(self.inner.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn instant_at(&self, nanos: u64) -> Instant {
        self.inner.origin + Duration::from_nanos(nanos)
    }

    /// Read the counters. A reset racing with this read can leave the
    /// report time ahead of the start; clamp instead of going negative.
    fn snapshot(&self) -> Snapshot {
        let started = self.inner.started_at.load(Ordering::Acquire);
        let value = self.inner.value.load(Ordering::Acquire);
        let max_value = self.inner.max_value.load(Ordering::Acquire);
        let fraction = match self.inner.fraction.load(Ordering::Acquire) {
            NO_FRACTION => None,
            bits => Some(f64::from_bits(bits)),
        };
        let reported = self.inner.reported_at.load(Ordering::Acquire).max(started);
        Snapshot {
            value,
            max_value,
            fraction,
            started: self.instant_at(started),
            reported: self.instant_at(reported),
        }
    }

    pub(crate) fn draw(&self, ctx: &mut RenderContext<'_>) -> Result<()> {
        let snapshot = self.snapshot();
        let progress = snapshot.progress();
        let filled = filled_cells(progress, self.interior_width());
        let units = percent_units(progress, self.inner.options.decimal_places);

        let previous = self.inner.last_percent.swap(units, Ordering::Relaxed);
        if previous == units {
            ctx.skip(self.bar_width())?;
        } else {
            self.paint_bar(ctx, filled, units)?;
        }

        if self.inner.options.show_readout {
            self.paint_readout(ctx, &snapshot, progress)?;
        }
        Ok(())
    }

    fn paint_bar(&self, ctx: &mut RenderContext<'_>, filled: u16, units: i64) -> Result<()> {
        let theme = &self.inner.options.theme;
        let border = Colors::new(theme.border, ctx.original_colors().background);
        let text = self.bar_text(units);
        let split = text
            .char_indices()
            .nth(usize::from(filled))
            .map_or(text.len(), |(idx, _)| idx);
        let (head, tail) = text.split_at(split);

        ctx.set_colors(border)?;
        ctx.write_char(theme.left_border)?;

        ctx.set_colors(theme.fill)?;
        ctx.write(head)?;
        ctx.set_colors(theme.rest)?;
        ctx.write(tail)?;
        ctx.restore_colors()?;

        ctx.set_colors(border)?;
        ctx.write_char(theme.right_border)?;
        ctx.restore_colors()
    }

    /// The interior text: the percentage centered over the interior width.
    ///
    /// `units` is the percentage scaled by `10^decimal_places`.
    fn bar_text(&self, units: i64) -> String {
        let interior = usize::from(self.interior_width());
        if !self.inner.options.show_percentage {
            return " ".repeat(interior);
        }
        let text_start = usize::from(self.interior_width().saturating_sub(PERCENT_TEXT_WIDTH) / 2);
        let text_end = text_start + usize::from(PERCENT_TEXT_WIDTH);
        let label = format_percent(units, self.inner.options.decimal_places);
        fit_to_width(&format!("{label:>text_end$}"), interior)
    }

    fn paint_readout(
        &self,
        ctx: &mut RenderContext<'_>,
        snapshot: &Snapshot,
        progress: f64,
    ) -> Result<()> {
        let frame = self.inner.frame.fetch_add(1, Ordering::Relaxed);
        let readout = if progress >= REPORT_THRESHOLD {
            let elapsed = ctx.now().saturating_duration_since(snapshot.started);
            let left = time_left(elapsed, progress);
            let separator = if elapsed.as_secs() % 2 == 0 { ':' } else { ' ' };
            format!(" {}", format_clock(left.as_secs(), separator))
        } else {
            let pulse = &self.inner.pulse;
            format!(" {}", pulse[frame % pulse.len()])
        };
        ctx.write(&fit_to_width(&readout, usize::from(READOUT_WIDTH)))
    }

    pub(crate) fn dispose(&self, ctx: &mut RenderContext<'_>) -> Result<()> {
        let snapshot = self.snapshot();
        let total = snapshot
            .reported
            .saturating_duration_since(snapshot.started);
        let done = Colors::new(
            self.inner.options.theme.done,
            ctx.original_colors().background,
        );

        ctx.set_colors(done)?;
        ctx.write("Done")?;
        ctx.restore_colors()?;
        ctx.write(&format!(" - {}", format_clock(total.as_secs(), ':')))?;
        ctx.fill_remaining()
    }
}

/// Number of interior cells painted in the fill colors.
pub(crate) fn filled_cells(progress: f64, interior: u16) -> u16 {
    let cells = (progress.clamp(0.0, 1.0) * f64::from(interior)).floor() as u16;
    cells.min(interior)
}

/// Percentage truncated to `decimal_places`, scaled to an integer so equal
/// displays compare equal.
pub(crate) fn percent_units(progress: f64, decimal_places: u8) -> i64 {
    let scale = 10f64.powi(i32::from(decimal_places));
    (progress.clamp(0.0, 1.0) * 100.0 * scale).floor() as i64
}

/// `units` rendered as a percentage: `" 42%"`, `" 42.5%"`, `"100.00%"`.
pub(crate) fn format_percent(units: i64, decimal_places: u8) -> String {
    if decimal_places == 0 {
        return format!("{units:>3}%");
    }
    let places = usize::from(decimal_places);
    let width = 4 + places;
    let value = units as f64 / 10f64.powi(i32::from(decimal_places));
    format!("{value:>width$.places$}%")
}

/// Estimated time remaining given the time spent reaching `progress`.
pub(crate) fn time_left(elapsed: Duration, progress: f64) -> Duration {
    if progress <= 0.0 {
        return Duration::ZERO;
    }
    let secs = elapsed.as_secs_f64() / progress * (1.0 - progress);
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}
