//! Status Line - owns one terminal row and keeps its columns painted
//!
//! # Implementation Note: one lock, many producers
//!
//! The terminal is a single shared resource: painting a column is a
//! move-cursor, set-colors, write, restore-colors sequence, and any other
//! write landing in the middle of it corrupts the line. So the terminal,
//! the column list and the line's geometry all live in one `Canvas`
//! behind one mutex. Redraw passes, `add_column` and `dispose` take it;
//! nothing else does.
//!
//! Progress producers never touch that lock. Columns are handles over
//! atomics (see [`ProgressBar`](crate::ProgressBar)), so worker threads
//! report progress freely and the redraw thread reads a snapshot inside
//! its exclusive window.
//!
//! ```text
//!   workers ──step()──▶ column atomics ◀──read── redraw pass ─┐
//!                                                              │ Canvas lock
//!   client ──add_column()/dispose()───────────────────────────┤
//!   ticker thread ──every interval──▶ redraw pass ─────────────┘
//! ```

use crate::column::{Column, Width};
use crate::config::{StatusLineConfig, interval_for, validate_fps};
use crate::render::RenderContext;
use crate::terminal::{Colors, Terminal};
use crate::ticker::Ticker;
use crate::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, error, trace, warn};

/// Column where the first registered column starts.
const FIRST_COLUMN_LEFT: u16 = 1;

/// Position and resolved width of a registered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    /// First cell of the column.
    pub left: u16,
    /// Cells the column paints, clamped to the buffer.
    pub width: u16,
}

struct Slot {
    left: u16,
    column: Column,
}

struct Canvas {
    term: Box<dyn Terminal>,
    top: u16,
    original: Colors,
    slots: Vec<Slot>,
    redirected: bool,
    hide_cursor: bool,
    cursor_hidden: bool,
    disposed: bool,
}

impl Canvas {
    /// Left edge for the next column: one past the rightmost occupied cell.
    fn next_left(&self) -> Result<u16> {
        let mut next = FIRST_COLUMN_LEFT;
        for slot in &self.slots {
            let Width::Fixed(cells) = slot.column.width() else {
                return Err(Error::layout(
                    "cannot add a column after a fill-width column",
                ));
            };
            let right = slot
                .left
                .checked_add(cells)
                .ok_or_else(|| Error::layout("column extends past the addressable width"))?;
            next = next.max(right);
        }
        Ok(next)
    }

    /// Paint every dirty column. Returns how many were painted.
    fn paint(&mut self, now: Instant) -> Result<usize> {
        if self.disposed || self.redirected {
            return Ok(0);
        }
        let buffer_width = self.term.buffer_width()?;
        let mut painted = 0;

        for slot in &self.slots {
            if !slot.column.is_dirty() {
                continue;
            }
            let width = slot.column.width().resolve(slot.left, buffer_width);
            if width == 0 {
                continue;
            }
            self.term.move_to(slot.left, self.top)?;
            let mut ctx = RenderContext::new(
                self.term.as_mut(),
                self.top,
                slot.left,
                width,
                self.original,
                now,
            );
            slot.column.draw(&mut ctx)?;
            painted += 1;
        }

        self.term.flush()?;
        Ok(painted)
    }

    /// Tear down every column in registration order, then release the row.
    ///
    /// Every step runs even if an earlier one failed, so the cursor is
    /// shown again whatever happens. The first error is returned.
    fn dispose(&mut self, now: Instant) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;
        let had_columns = !self.slots.is_empty();
        let slots = std::mem::take(&mut self.slots);
        let mut first_error = None;

        match self.term.buffer_width() {
            Ok(buffer_width) => {
                for slot in &slots {
                    let result = self.dispose_slot(slot, buffer_width, now);
                    keep_first(&mut first_error, result);
                }
            }
            Err(err) => keep_first(&mut first_error, Err(err)),
        }

        if self.cursor_hidden {
            let result = self.term.show_cursor();
            if result.is_ok() {
                self.cursor_hidden = false;
            }
            keep_first(&mut first_error, result);
        }
        if !self.redirected {
            let result = self.term.move_to(0, self.top);
            keep_first(&mut first_error, result);
        }
        if had_columns || !self.redirected {
            let result = self.term.newline();
            keep_first(&mut first_error, result);
        }
        let result = self.term.flush();
        keep_first(&mut first_error, result);

        first_error.map_or(Ok(()), Err)
    }

    fn dispose_slot(&mut self, slot: &Slot, buffer_width: u16, now: Instant) -> Result<()> {
        let width = slot.column.width().resolve(slot.left, buffer_width);
        if !self.redirected {
            self.term.move_to(slot.left, self.top)?;
        }
        let mut ctx = RenderContext::new(
            self.term.as_mut(),
            self.top,
            slot.left,
            width,
            self.original,
            now,
        )
        .plain(self.redirected);
        slot.column.dispose(&mut ctx)
    }
}

/// Record `result`'s error unless an earlier one is already held.
fn keep_first(first: &mut Option<Error>, result: Result<()>) {
    if let Err(err) = result {
        if first.is_some() {
            warn!(error = %err, "further teardown error");
        } else {
            *first = Some(err);
        }
    }
}

struct Shared {
    canvas: Mutex<Canvas>,
    interval_nanos: Arc<AtomicU64>,
    failure: Mutex<Option<Error>>,
}

impl Shared {
    fn canvas(&self) -> MutexGuard<'_, Canvas> {
        // A panic mid-paint leaves a half-drawn line, not a broken canvas
        self.canvas.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn redraw(&self) -> Result<usize> {
        let painted = self.canvas().paint(Instant::now())?;
        trace!(painted, "redraw pass");
        Ok(painted)
    }

    /// One ticker iteration. Returns `false` to stop the ticker.
    fn tick(&self) -> bool {
        match self.redraw() {
            Ok(_) => !self.canvas().disposed,
            Err(err) => {
                error!(error = %err, "status line redraw failed, stopping ticker");
                self.failure
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get_or_insert(err);
                false
            }
        }
    }

    fn take_failure(&self) -> Option<Error> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// A single terminal row split into independently redrawn columns.
///
/// ```no_run
/// use tline_core::{CrosstermTerminal, Label, ProgressBar, Spinner, StatusLine, Width};
///
/// # fn main() -> tline_core::Result<()> {
/// let status = StatusLine::new(CrosstermTerminal::stdout(), Default::default())?;
/// let bar = ProgressBar::new(100)?;
/// status.add_column(Spinner::new())?;
/// status.add_column(Label::new(Width::Fixed(12)).with_content("downloading"))?;
/// status.add_column(bar.clone())?;
/// status.start()?;
///
/// for _ in 0..100 {
///     bar.step();
/// }
/// status.dispose()?;
/// # Ok(())
/// # }
/// ```
pub struct StatusLine {
    shared: Arc<Shared>,
    ticker: Mutex<Option<Ticker>>,
}

impl StatusLine {
    /// Claim the terminal row under the cursor.
    ///
    /// If the cursor is mid-line a newline is emitted first, so the status
    /// line always starts on a row of its own.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or the terminal cannot be queried.
    pub fn new(term: impl Terminal + 'static, config: StatusLineConfig) -> Result<Self> {
        config.validate()?;
        let mut term: Box<dyn Terminal> = Box::new(term);
        let redirected = term.is_redirected();

        let top = if redirected {
            0
        } else {
            let (col, row) = term.cursor_position()?;
            if col == 0 {
                row
            } else {
                term.newline()?;
                term.flush()?;
                term.cursor_position()?.1
            }
        };
        let original = term.colors();
        debug!(top, redirected, fps = config.fps, "status line created");

        let interval = u64::try_from(config.interval().as_nanos()).unwrap_or(u64::MAX);
        Ok(Self {
            shared: Arc::new(Shared {
                canvas: Mutex::new(Canvas {
                    term,
                    top,
                    original,
                    slots: Vec::new(),
                    redirected,
                    hide_cursor: config.hide_cursor,
                    cursor_hidden: false,
                    disposed: false,
                }),
                interval_nanos: Arc::new(AtomicU64::new(interval)),
                failure: Mutex::new(None),
            }),
            ticker: Mutex::new(None),
        })
    }

    /// Register a column to the right of the existing ones.
    ///
    /// Returns the column's left edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Layout`] if the previous column fills the rest of
    /// the line or no cell is left, and [`Error::Disposed`] after
    /// [`dispose`](Self::dispose).
    pub fn add_column(&self, column: impl Into<Column>) -> Result<u16> {
        let column = column.into();
        let mut canvas = self.shared.canvas();
        if canvas.disposed {
            return Err(Error::Disposed);
        }

        let left = canvas.next_left()?;
        let buffer_width = canvas.term.buffer_width()?;
        if left >= buffer_width {
            return Err(Error::layout(format!(
                "column at {left} starts past the buffer width {buffer_width}"
            )));
        }

        debug!(
            index = canvas.slots.len(),
            left,
            width = ?column.width(),
            "column added"
        );
        canvas.slots.push(Slot { left, column });
        Ok(left)
    }

    /// Begin repainting in the background.
    ///
    /// Does nothing when output is redirected or the ticker already runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Disposed`] after [`dispose`](Self::dispose), or
    /// [`Error::Io`] if the ticker thread cannot be spawned.
    pub fn start(&self) -> Result<()> {
        {
            let mut canvas = self.shared.canvas();
            if canvas.disposed {
                return Err(Error::Disposed);
            }
            if canvas.redirected {
                debug!("output redirected, live redraw disabled");
                return Ok(());
            }
            if canvas.hide_cursor && !canvas.cursor_hidden {
                canvas.term.hide_cursor()?;
                canvas.term.flush()?;
                canvas.cursor_hidden = true;
            }
        }

        let mut ticker = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        if ticker.is_some() {
            return Ok(());
        }
        let shared = Arc::clone(&self.shared);
        *ticker = Some(Ticker::spawn(
            Arc::clone(&self.shared.interval_nanos),
            move || shared.tick(),
        )?);
        debug!(interval = ?self.interval(), "ticker started");
        Ok(())
    }

    /// Paint all dirty columns now, on the calling thread.
    ///
    /// Returns how many columns were painted.
    ///
    /// # Errors
    ///
    /// Propagates terminal write failures.
    pub fn redraw(&self) -> Result<usize> {
        self.shared.redraw()
    }

    /// Change the repaint rate. Applies from the next interval on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `fps` is finite and
    /// positive.
    pub fn set_fps(&self, fps: f64) -> Result<()> {
        validate_fps(fps)?;
        let nanos = u64::try_from(interval_for(fps).as_nanos()).unwrap_or(u64::MAX);
        self.shared.interval_nanos.store(nanos, Ordering::Release);
        debug!(fps, "refresh rate changed");
        Ok(())
    }

    /// Current delay between repaints.
    pub fn interval(&self) -> Duration {
        Duration::from_nanos(self.shared.interval_nanos.load(Ordering::Acquire))
    }

    /// Row this line paints on.
    pub fn top(&self) -> u16 {
        self.shared.canvas().top
    }

    /// Colors captured at construction.
    pub fn original_colors(&self) -> Colors {
        self.shared.canvas().original
    }

    /// Number of registered columns.
    pub fn column_count(&self) -> usize {
        self.shared.canvas().slots.len()
    }

    /// Spans of all registered columns, left to right.
    ///
    /// # Errors
    ///
    /// Fails if the terminal width cannot be queried.
    pub fn layout(&self) -> Result<Vec<ColumnSpan>> {
        let canvas = self.shared.canvas();
        let buffer_width = canvas.term.buffer_width()?;
        Ok(canvas
            .slots
            .iter()
            .map(|slot| ColumnSpan {
                left: slot.left,
                width: slot.column.width().resolve(slot.left, buffer_width),
            })
            .collect())
    }

    /// Whether the background ticker is running.
    pub fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.shared.canvas().disposed
    }

    /// Tear down every column, release the row and stop the ticker.
    ///
    /// Safe to call more than once; later calls do nothing. Returns the
    /// first error the background ticker hit, if any.
    ///
    /// # Errors
    ///
    /// A failed background redraw is reported here once. Otherwise any
    /// terminal error from the final paint.
    pub fn dispose(&self) -> Result<()> {
        let result = self.shared.canvas().dispose(Instant::now());

        let ticker = self
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(ticker) = ticker {
            ticker.stop();
            debug!("status line disposed");
        }

        // The ticker's failure happened first; report it over our own
        match self.shared.take_failure() {
            Some(err) => Err(err),
            None => result,
        }
    }
}

impl std::fmt::Debug for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusLine")
            .field("interval", &self.interval())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Drop for StatusLine {
    fn drop(&mut self) {
        if let Err(err) = self.dispose() {
            warn!(error = %err, "status line teardown failed");
        }
    }
}
