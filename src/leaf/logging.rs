//! stderr logging.
//!
//! Diagnostics go to stderr so they never mix with note output on stdout.
//! `RUST_LOG` overrides the level picked from the verbosity flag.

use flexi_logger::{Logger, LoggerHandle};

use crate::errors::Result;

/// log level for a `-v` count
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Start the logger. Keep the returned handle alive for as long as
/// logging is wanted.
pub fn init_logging(verbosity: u8) -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(level_for(verbosity))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()?;
    Ok(handle)
}
