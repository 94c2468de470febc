use crate::capture::{FrameCapturer, ScreenSource};
use crate::storage::OutputDirectory;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared stop flag for the capture loop. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread for the full duration.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Counters reported once the loop is cancelled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

pub struct CaptureScheduler<S, Z> {
    capturer: FrameCapturer<S>,
    sleeper: Z,
    interval: Duration,
}

impl<S: ScreenSource, Z: Sleeper> CaptureScheduler<S, Z> {
    pub fn new(capturer: FrameCapturer<S>, sleeper: Z, interval: Duration) -> Self {
        CaptureScheduler {
            capturer,
            sleeper,
            interval,
        }
    }

    /// Capture, sleep, repeat until `token` is cancelled.
    ///
    /// A failed capture is logged and counted; the next one still fires after
    /// the normal interval. Nothing is retried early.
    pub fn run(&self, directory: &OutputDirectory, token: &CancellationToken) -> RunSummary {
        let mut summary = RunSummary::default();

        while !token.is_cancelled() {
            summary.attempts += 1;
            match self.capturer.capture(directory) {
                Ok(path) => {
                    summary.successes += 1;
                    log::info!("Saved {}", path.display());
                }
                Err(err) => {
                    summary.failures += 1;
                    log::error!("Capture {} failed: {err}", summary.attempts);
                }
            }
            self.sleeper.sleep(self.interval);
        }

        log::info!(
            "Capture loop stopped after {} attempts ({} failed)",
            summary.attempts,
            summary.failures
        );
        summary
    }
}
