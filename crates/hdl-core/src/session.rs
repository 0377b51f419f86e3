//! One download operation: counter + observer + engine, with guaranteed observer shutdown.

use anyhow::Context;
use std::io::Write;
use std::sync::Arc;

use crate::progress::{ObserverOptions, ProgressCounter, ProgressObserver};
use crate::request::DownloadRequest;
use crate::transfer::{DownloadOutcome, Downloader, TransferError};

/// Runs one download with a live progress observer rendering to `progress_sink`.
///
/// The observer is started first and, whatever the engine returns, is stopped and
/// joined before this function returns: its final line is always the last thing it
/// writes. A panic in the engine still stops it (the handle joins on drop).
pub fn run_download<P>(
    downloader: &Downloader,
    request: &DownloadRequest,
    observer_options: ObserverOptions,
    console: &mut dyn Write,
    progress_sink: P,
) -> Result<DownloadOutcome, TransferError>
where
    P: Write + Send + 'static,
{
    let counter = Arc::new(ProgressCounter::new());
    let observer = ProgressObserver::spawn(Arc::clone(&counter), progress_sink, observer_options)
        .context("failed to start progress observer")?;

    let result = downloader.download(request, &counter, console);

    let report = observer.finish();
    debug_assert_eq!(report.final_bytes, counter.bytes());
    if let Ok(outcome) = &result {
        debug_assert_eq!(outcome.bytes, report.final_bytes);
    }
    result
}
