//! Per-transfer state shared by the curl header and write callbacks.
//!
//! Headers are tracked per response (redirect hops reset them). The destination file
//! is opened lazily: on the first body chunk, or after a successful empty response.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::error::TransferError;
use crate::progress::ProgressCounter;
use crate::url_model::derive_filename;

/// Open destination file and how much of the body has reached it.
pub(super) struct Destination {
    pub(super) path: PathBuf,
    file: File,
    pub(super) written: u64,
}

pub(super) struct ResponseState<'a> {
    url: &'a str,
    output_dir: &'a Path,
    sanitize: bool,
    console: &'a mut dyn Write,
    status: Option<u32>,
    reason: Option<String>,
    content_disposition: Option<String>,
    pub(super) destination: Option<Destination>,
    /// First failure raised inside a callback; wins over the curl error it causes.
    pub(super) error: Option<TransferError>,
}

impl<'a> ResponseState<'a> {
    pub(super) fn new(
        url: &'a str,
        output_dir: &'a Path,
        sanitize: bool,
        console: &'a mut dyn Write,
    ) -> Self {
        Self {
            url,
            output_dir,
            sanitize,
            console,
            status: None,
            reason: None,
            content_disposition: None,
            destination: None,
            error: None,
        }
    }

    pub(super) fn status(&self) -> Option<u32> {
        self.status
    }

    pub(super) fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Header callback. Always continues; header parsing never aborts a transfer.
    pub(super) fn on_header(&mut self, data: &[u8]) -> bool {
        let line = String::from_utf8_lossy(data);
        let line = line.trim_end();
        if line.starts_with("HTTP/") {
            // New response (first one or after a redirect / 1xx): forget earlier headers.
            let mut parts = line.splitn(3, ' ');
            let _version = parts.next();
            self.status = parts.next().and_then(|s| s.parse().ok());
            self.reason = parts.next().map(str::to_string);
            self.content_disposition = None;
        } else if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-disposition") {
                self.content_disposition = Some(value.trim().to_string());
            }
        }
        true
    }

    /// Write callback: persist the chunk, then advance the counter.
    /// Returns the number of bytes consumed; anything short of `chunk.len()` aborts curl.
    pub(super) fn on_body(&mut self, chunk: &[u8], counter: &ProgressCounter) -> usize {
        if chunk.is_empty() {
            return 0;
        }
        if self.error.is_some() {
            return 0;
        }
        if !self.status.is_some_and(is_success) {
            let status = self.status.unwrap_or(0);
            self.error = Some(TransferError::http(self.url, status, self.reason.as_deref()));
            return 0;
        }
        if self.destination.is_none() {
            if let Err(e) = self.open_destination() {
                self.error = Some(e);
                return 0;
            }
        }
        let Some(dest) = self.destination.as_mut() else {
            return 0;
        };
        if let Err(source) = dest.file.write_all(chunk) {
            self.error = Some(TransferError::Io {
                path: dest.path.clone(),
                source,
            });
            return 0;
        }
        dest.written += chunk.len() as u64;
        counter.advance(chunk.len() as u64);
        chunk.len()
    }

    /// Decide the filename from the current response, create/truncate it and announce it.
    pub(super) fn open_destination(&mut self) -> Result<(), TransferError> {
        let name = derive_filename(self.url, self.content_disposition.as_deref(), self.sanitize);
        let path = self.output_dir.join(&name);
        let file = File::create(&path).map_err(|source| TransferError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "saving download");
        if let Err(e) = announce(self.console, &name) {
            tracing::debug!("console write failed: {}", e);
        }
        self.destination = Some(Destination {
            path,
            file,
            written: 0,
        });
        Ok(())
    }

    pub(super) fn into_destination(self) -> Option<Destination> {
        self.destination
    }
}

impl Destination {
    pub(super) fn flush(&mut self) -> Result<(), TransferError> {
        self.file.flush().map_err(|source| TransferError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn announce(console: &mut dyn Write, name: &str) -> io::Result<()> {
    writeln!(console, "Saving to: {name}")?;
    console.flush()
}

pub(super) fn is_success(status: u32) -> bool {
    (200..300).contains(&status)
}
