//! Transfer failure taxonomy and curl error classification.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// User-facing failure category; the CLI prints one diagnostic per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Server answered with a non-success status.
    Http,
    /// The URL could not be fetched: bad URL, unreachable host, broken connection.
    Network,
    /// Anything else (filesystem, internal failures).
    Unexpected,
}

/// Why a download failed. Nothing is retried.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Non-2xx final status. No file was created.
    #[error("{status_text} for url: {url}")]
    Http {
        url: String,
        status: u32,
        /// Status code plus reason phrase when the server sent one, e.g. `404 Not Found`.
        status_text: String,
    },

    /// Malformed URL or unsupported scheme, DNS, connect, TLS, timeout, reset or
    /// truncated body. A partial file may remain.
    #[error("{0}")]
    Network(#[source] curl::Error),

    /// Creating or writing the destination file failed.
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Everything else; displayed with its whole context chain.
    #[error("{0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl TransferError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TransferError::Http { .. } => ErrorCategory::Http,
            TransferError::Network(_) => ErrorCategory::Network,
            TransferError::Io { .. } | TransferError::Unexpected(_) => ErrorCategory::Unexpected,
        }
    }

    pub(crate) fn http(url: &str, status: u32, reason: Option<&str>) -> Self {
        let status_text = match reason.map(str::trim).filter(|r| !r.is_empty()) {
            Some(reason) => format!("{status} {reason}"),
            None => status.to_string(),
        };
        TransferError::Http {
            url: url.to_string(),
            status,
            status_text,
        }
    }
}

impl From<curl::Error> for TransferError {
    fn from(e: curl::Error) -> Self {
        if is_network_error(&e) {
            TransferError::Network(e)
        } else {
            TransferError::Unexpected(anyhow::Error::new(e).context("transfer failed"))
        }
    }
}

/// True for failures to fetch the URL: transport-level errors plus URLs curl cannot
/// use at all. Local failures (write callback aborts, internal errors) are excluded.
pub fn is_network_error(e: &curl::Error) -> bool {
    e.is_url_malformed()
        || e.is_unsupported_protocol()
        || e.is_operation_timedout()
        || e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
        || e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_too_many_redirects()
        || e.is_http2_error()
        || e.is_http2_stream_error()
}
