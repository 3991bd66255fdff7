//! Redraw ticker
//!
//! A dedicated thread that calls a tick function once per interval until
//! told to stop. It blocks in `recv_timeout` on its control channel, so a
//! shutdown request wakes it immediately instead of after the next sleep.
//!
//! The interval is reread before every wait, so a rate change takes effect
//! on the next rearm and never shortens a wait already in progress.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Messages accepted by the ticker thread.
#[derive(Debug)]
enum TickerEvent {
    Shutdown,
}

/// Handle to a running ticker thread.
#[derive(Debug)]
pub(crate) struct Ticker {
    sender: mpsc::Sender<TickerEvent>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Ticker {
    /// Spawn the ticker. `tick` returns `false` to end the loop.
    pub(crate) fn spawn<F>(interval_nanos: Arc<AtomicU64>, mut tick: F) -> std::io::Result<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("tline-ticker".to_string())
            .spawn(move || {
                loop {
                    let wait = Duration::from_nanos(interval_nanos.load(Ordering::Acquire));
                    match receiver.recv_timeout(wait) {
                        Err(mpsc::RecvTimeoutError::Timeout) => {
                            if !tick() {
                                break;
                            }
                        }
                        Ok(TickerEvent::Shutdown) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                            break;
                        }
                    }
                }
                tracing::debug!("ticker stopped");
            })?;

        Ok(Self {
            sender,
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it to exit.
    pub(crate) fn stop(mut self) {
        let _ = self.sender.send(TickerEvent::Shutdown);
        if self.handle.take().is_some_and(|handle| handle.join().is_err()) {
            tracing::warn!("ticker thread panicked");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        // Ignore errors if the thread already exited
        let _ = self.sender.send(TickerEvent::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    fn nanos(ms: u64) -> Arc<AtomicU64> {
        Arc::new(AtomicU64::new(Duration::from_millis(ms).as_nanos() as u64))
    }

    #[test]
    fn test_ticks_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let ticker = Ticker::spawn(nanos(5), move || {
            seen.fetch_add(1, Ordering::SeqCst);
            true
        })
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        ticker.stop();

        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop >= 3);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_tick_returning_false_ends_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let ticker = Ticker::spawn(nanos(1), move || {
            seen.fetch_add(1, Ordering::SeqCst);
            false
        })
        .unwrap();

        thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        ticker.stop();
    }

    #[test]
    fn test_stop_wakes_long_wait() {
        let ticker = Ticker::spawn(nanos(60_000), || true).unwrap();
        let started = Instant::now();
        ticker.stop();
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
