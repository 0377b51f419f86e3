//! CLI for the HDL downloader: `hdl <URL>`.

mod console;

use clap::error::ErrorKind;
use clap::Parser;
use hdl_core::config::{self, HdlConfig};
use hdl_core::progress::render::format_thousands;
use hdl_core::request::DownloadRequest;
use hdl_core::session::run_download;
use hdl_core::transfer::{DownloadOutcome, Downloader, ErrorCategory, TransferError};
use std::ffi::OsString;
use std::io;

use console::LineConsole;

/// Top-level CLI: one positional URL.
#[derive(Debug, Parser)]
#[command(name = "hdl", version)]
#[command(about = "HDL: download one URL to the current directory with live progress", long_about = None)]
pub struct Cli {
    /// Direct HTTP/HTTPS URL to download.
    pub url: String,
}

impl Cli {
    /// Parse the process arguments, run the download and return the exit code.
    pub fn run_from_args() -> i32 {
        Self::run_with(std::env::args_os(), load_config)
    }

    /// Exit code for one invocation: 0 on success and for `--help`/`--version`,
    /// 1 for usage errors and failed downloads. `load` is only called once the
    /// arguments are valid.
    pub fn run_with<I, T>(args: I, load: impl FnOnce() -> HdlConfig) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(err) => {
                let _ = err.print();
                return match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                    _ => 1,
                };
            }
        };
        let cfg = load();
        match cli.run(&cfg) {
            Ok(outcome) => {
                println!(
                    "Download complete: {} ({} bytes)",
                    outcome.file_name(),
                    format_thousands(outcome.bytes)
                );
                0
            }
            Err(err) => {
                tracing::error!("download failed: {}", err);
                eprintln!("{}", diagnostic(&err));
                1
            }
        }
    }

    fn run(&self, cfg: &HdlConfig) -> Result<DownloadOutcome, TransferError> {
        let output_dir = std::env::current_dir()
            .map_err(|e| anyhow::Error::new(e).context("cannot determine current directory"))?;
        println!("Starting download from {}", self.url);

        let downloader = Downloader::new(cfg.transfer_options(), output_dir);
        let request = DownloadRequest::new(self.url.clone());
        let mut console = LineConsole::stdout();
        run_download(
            &downloader,
            &request,
            cfg.observer_options(),
            &mut console,
            io::stdout(),
        )
    }
}

/// Config problems must not block a download: warn and fall back to defaults.
fn load_config() -> HdlConfig {
    match config::load_or_init() {
        Ok(cfg) => {
            tracing::debug!("loaded config: {:?}", cfg);
            cfg
        }
        Err(err) => {
            tracing::warn!("using default config: {:#}", err);
            HdlConfig::default()
        }
    }
}

/// The single diagnostic line printed for a failed download.
pub fn diagnostic(err: &TransferError) -> String {
    let label = match err.category() {
        ErrorCategory::Http => "HTTP error",
        ErrorCategory::Network => "Network error",
        ErrorCategory::Unexpected => "Unexpected error",
    };
    format!("{label}: {err}")
}
