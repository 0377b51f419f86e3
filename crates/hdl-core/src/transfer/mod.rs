//! Single-stream HTTP GET downloader.
//!
//! One GET (redirects followed), body streamed in bounded chunks straight into the
//! destination file, shared counter advanced after every write. No Range, no retry.

mod error;
mod response;

pub use error::{is_network_error, ErrorCategory, TransferError};

use anyhow::Context;
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::progress::ProgressCounter;
use crate::request::DownloadRequest;
use response::{is_success, ResponseState};

/// Engine settings (see `HdlConfig::transfer_options`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Maximum bytes handed to the write callback at once.
    pub chunk_size: usize,
    pub connect_timeout: Duration,
    pub max_redirections: u32,
    /// Abort as stalled below this rate (bytes/s) ...
    pub low_speed_limit: u32,
    /// ... sustained for this long.
    pub low_speed_time: Duration,
    /// Run filename hints through `sanitize_filename_for_linux`.
    pub sanitize_filenames: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            chunk_size: 8192,
            connect_timeout: Duration::from_secs(30),
            max_redirections: 10,
            low_speed_limit: 1,
            low_speed_time: Duration::from_secs(60),
            sanitize_filenames: true,
        }
    }
}

/// A finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Where the body was written.
    pub path: PathBuf,
    /// Bytes written; equals the counter's final value and the file length.
    pub bytes: u64,
}

impl DownloadOutcome {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Downloads into `output_dir`, one request at a time.
#[derive(Debug, Clone)]
pub struct Downloader {
    options: TransferOptions,
    output_dir: PathBuf,
}

impl Downloader {
    pub fn new(options: TransferOptions, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            options,
            output_dir: output_dir.into(),
        }
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Performs the GET and streams the body to disk, advancing `counter` per chunk.
    ///
    /// The filename announcement goes to `console`. A non-2xx status fails before any
    /// file is touched; a transport failure mid-body leaves the partial file in place.
    /// Does not touch the counter's active flag; the caller owns the observer lifecycle.
    pub fn download(
        &self,
        request: &DownloadRequest,
        counter: &ProgressCounter,
        console: &mut dyn Write,
    ) -> Result<DownloadOutcome, TransferError> {
        let url = request.url();
        tracing::info!(url, "GET");

        let mut easy = self.build_handle(request)?;
        let state = RefCell::new(ResponseState::new(
            url,
            &self.output_dir,
            self.options.sanitize_filenames,
            console,
        ));

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| state.borrow_mut().on_header(data))?;
            transfer.write_function(|data| Ok(state.borrow_mut().on_body(data, counter)))?;
            transfer.perform()
        };

        let mut state = state.into_inner();
        if let Some(err) = state.error.take() {
            tracing::warn!(url, "transfer aborted: {}", err);
            return Err(err);
        }
        if let Err(e) = performed {
            tracing::warn!(url, "transfer failed: {}", e);
            if e.is_http_returned_error() {
                let status = easy.response_code().unwrap_or(0);
                let reason = state.reason().filter(|_| state.status() == Some(status));
                return Err(TransferError::http(url, status, reason));
            }
            return Err(e.into());
        }

        let status = easy.response_code().context("no response code")?;
        if !is_success(status) {
            let reason = state.reason().filter(|_| state.status() == Some(status));
            return Err(TransferError::http(url, status, reason));
        }

        // Empty body: the write callback never ran, but the file still has to exist.
        if state.destination.is_none() {
            state.open_destination()?;
        }
        let Some(mut dest) = state.into_destination() else {
            return Err(anyhow::anyhow!("destination was not opened").into());
        };
        dest.flush()?;

        tracing::info!(path = %dest.path.display(), bytes = dest.written, "download complete");
        Ok(DownloadOutcome {
            path: dest.path,
            bytes: dest.written,
        })
    }

    fn build_handle(&self, request: &DownloadRequest) -> Result<curl::easy::Easy, TransferError> {
        let opts = &self.options;
        let mut easy = curl::easy::Easy::new();
        easy.url(request.url()).context("invalid URL")?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(opts.max_redirections)?;
        // 4xx/5xx end the transfer before any body byte reaches the write callback.
        easy.fail_on_error(true)?;
        easy.buffer_size(opts.chunk_size)?;
        easy.connect_timeout(opts.connect_timeout)?;
        easy.low_speed_limit(opts.low_speed_limit)?;
        easy.low_speed_time(opts.low_speed_time)?;

        let mut list = curl::easy::List::new();
        for line in request.header_lines() {
            list.append(&line)?;
        }
        easy.http_headers(list)?;
        Ok(easy)
    }
}
