//! Background thread that periodically renders the shared byte counter.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::counter::ProgressCounter;
use super::render::{final_line, in_place};

/// Observer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverOptions {
    /// Sleep between two renders.
    pub interval: Duration,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// What the observer did over its lifetime, returned when it is joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserverReport {
    /// Periodic in-place renders while the transfer was active.
    pub renders: u64,
    /// Byte count shown by the final, line-terminated render.
    pub final_bytes: u64,
}

/// Spawns the observer thread.
pub struct ProgressObserver;

impl ProgressObserver {
    /// Start rendering `counter` to `sink` every `options.interval` until the counter's
    /// active flag is cleared. The returned handle must be finished (or dropped) to stop it.
    pub fn spawn<W>(
        counter: Arc<ProgressCounter>,
        sink: W,
        options: ObserverOptions,
    ) -> io::Result<ObserverHandle>
    where
        W: Write + Send + 'static,
    {
        let thread_counter = Arc::clone(&counter);
        let thread = thread::Builder::new()
            .name("hdl-progress".to_string())
            .spawn(move || run_loop(&thread_counter, sink, options.interval))?;
        tracing::debug!(interval_ms = options.interval.as_millis() as u64, "progress observer started");
        Ok(ObserverHandle {
            counter,
            thread: Some(thread),
        })
    }
}

/// Running: render in place, sleep, repeat while active. Stopping: one final render ending the line.
fn run_loop<W: Write>(counter: &ProgressCounter, mut sink: W, interval: Duration) -> ObserverReport {
    let mut report = ObserverReport::default();
    let final_bytes = loop {
        let snap = counter.snapshot();
        if !snap.active {
            break snap.bytes;
        }
        emit(&mut sink, &in_place(snap.bytes));
        report.renders += 1;
        thread::sleep(interval);
    };
    emit(&mut sink, &final_line(final_bytes));
    report.final_bytes = final_bytes;
    report
}

// Rendering is advisory: a broken terminal must not affect the transfer.
fn emit<W: Write>(sink: &mut W, text: &str) {
    if let Err(e) = sink.write_all(text.as_bytes()).and_then(|()| sink.flush()) {
        tracing::debug!("progress render failed: {}", e);
    }
}

/// Owns the observer thread. `finish` (or drop) clears the active flag and joins,
/// so the final render is on screen before the caller continues.
pub struct ObserverHandle {
    counter: Arc<ProgressCounter>,
    thread: Option<JoinHandle<ObserverReport>>,
}

impl ObserverHandle {
    /// Stop the observer and wait for its final render.
    pub fn finish(mut self) -> ObserverReport {
        self.stop_and_join()
    }

    fn stop_and_join(&mut self) -> ObserverReport {
        self.counter.finish();
        let Some(thread) = self.thread.take() else {
            return ObserverReport::default();
        };
        let report = thread.join().unwrap_or_else(|_| {
            tracing::warn!("progress observer thread panicked");
            ObserverReport::default()
        });
        tracing::debug!(
            renders = report.renders,
            final_bytes = report.final_bytes,
            "progress observer stopped"
        );
        report
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.stop_and_join();
        }
    }
}
