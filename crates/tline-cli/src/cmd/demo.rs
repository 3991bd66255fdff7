//! `tline demo` - a simulated job

use anyhow::{Context, Result, anyhow};
use std::thread;
use std::time::{Duration, Instant};
use tline_core::{
    CrosstermTerminal, Label, ProgressBar, Spinner, StatusLine, StatusLineConfig, Width,
};

/// Options for the demo run.
#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub steps: u64,
    pub delay: Duration,
    pub label: String,
    pub width: u16,
}

/// Run the demo against stdout.
pub fn demo(config: StatusLineConfig, opts: &DemoOptions) -> Result<()> {
    let status = StatusLine::new(CrosstermTerminal::stdout(), config)
        .context("failed to claim a status line")?;

    let label = Label::new(Width::Fixed(opts.width)).with_content(opts.label.clone());
    let bar = ProgressBar::new(opts.steps).context("invalid step count")?;
    let counter = Label::new(Width::Fill);

    status.add_column(Spinner::new())?;
    status.add_column(label.clone())?;
    status.add_column(bar.clone())?;
    status
        .add_column(counter.clone())
        .context("terminal too narrow for the demo")?;
    status.start()?;

    let started = Instant::now();
    let steps = opts.steps;
    let delay = opts.delay;
    let worker = thread::spawn(move || {
        for done in 1..=steps {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            bar.step();
            counter.set_content(format!(" {done}/{steps}"));
        }
    });
    worker
        .join()
        .map_err(|_| anyhow!("demo worker thread panicked"))?;

    label.set_content("finished");
    status.redraw()?;
    status.dispose()?;

    tracing::info!(
        steps,
        elapsed_ms = started.elapsed().as_millis(),
        "demo finished"
    );
    Ok(())
}
