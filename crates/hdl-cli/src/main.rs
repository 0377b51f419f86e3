use hdl_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Log to the XDG state file; stderr is the fallback so a read-only home never blocks a download.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    std::process::exit(Cli::run_from_args());
}
