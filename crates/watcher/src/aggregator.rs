//! Debounced event aggregation
//!
//! The aggregator owns the pending buffer and the debounce timer and is the
//! only thing that touches them. It runs the tests once at startup, then
//! services one input at a time:
//! - change: record it (last write wins per path) and rearm the timer
//! - error: log it, nothing else
//! - timer: drain the buffer, log relevant changes, run tests if any matched
//!
//! A test run is awaited inside the loop, so notifications arriving during a
//! run wait in their channel until it finishes.

use crate::coalesce::PendingBuffer;
use crate::debounce::DebounceTimer;
use crate::source::{WatchError, WatchEvent, WatchStreams};
use autotest_core::{relative_to, PendingChange, SuffixFilter, TestRunner, DEBOUNCE_PERIOD};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, error, info, trace, warn};

pub struct Aggregator<R> {
    /// Watched root; changes are recorded relative to it
    root: PathBuf,
    filter: SuffixFilter,
    runner: R,
    /// Arguments forwarded verbatim to every test run
    args: Vec<OsString>,
    pending: PendingBuffer,
    timer: DebounceTimer,
}

impl<R: TestRunner> Aggregator<R> {
    pub fn new(root: PathBuf, filter: SuffixFilter, runner: R, args: Vec<OsString>) -> Self {
        Self {
            root,
            filter,
            runner,
            args,
            pending: PendingBuffer::new(),
            timer: DebounceTimer::new(DEBOUNCE_PERIOD),
        }
    }

    /// Run the initial test, then aggregate events
    ///
    /// Returns once both streams are closed and nothing is pending. With a
    /// live watcher the streams never close, so this runs until cancelled.
    ///
    /// Selection is biased towards changes, then errors, then the timer. A
    /// change that becomes ready in the same poll as an expired deadline is
    /// recorded first and rearms the timer, deferring the evaluation.
    pub async fn run(mut self, streams: WatchStreams) {
        let WatchStreams {
            mut events,
            mut errors,
        } = streams;

        self.run_tests().await;

        let mut events_open = true;
        let mut errors_open = true;

        loop {
            tokio::select! {
                biased;

                received = events.recv(), if events_open => match received {
                    Some(event) => self.on_change(event),
                    None => {
                        debug!("Change stream closed");
                        events_open = false;
                    }
                },
                received = errors.recv(), if errors_open => match received {
                    Some(err) => self.on_error(&err),
                    None => {
                        debug!("Error stream closed");
                        errors_open = false;
                    }
                },
                () = self.timer.fired(), if self.timer.is_armed() => {
                    self.evaluate().await;
                }
                else => break,
            }
        }

        debug!("Aggregator stopped");
    }

    fn on_change(&mut self, event: WatchEvent) {
        let path = relative_to(&self.root, &event.path);
        trace!("{:?} {}", event.kind, path.display());

        self.pending.record(path, event.kind);
        self.timer.arm();
    }

    fn on_error(&self, err: &WatchError) {
        warn!("watcher error: {}", err);
    }

    /// Drain the buffer and run tests if any source file changed
    ///
    /// Returns the relevant changes that were logged.
    async fn evaluate(&mut self) -> Vec<PendingChange> {
        let drained = self.pending.drain();
        let total = drained.len();

        let relevant: Vec<PendingChange> = drained
            .into_iter()
            .filter(|change| self.filter.matches(&change.path))
            .collect();

        for change in &relevant {
            info!("{}", change);
        }

        if relevant.is_empty() {
            debug!(
                "No {} files among {} pending changes, skipping run",
                self.filter.suffix(),
                total
            );
        } else {
            self.run_tests().await;
        }

        relevant
    }

    async fn run_tests(&mut self) {
        if let Err(e) = self.runner.run(&self.args).await {
            error!("{}", e);
        }
    }
}
