//! Logging setup.
//!
//! The TUI owns the terminal, so while it runs logs go to a file in the data
//! directory. Plain subcommands log to stderr.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Log file name inside the data directory.
pub const LOG_FILE: &str = "quadro.log";

/// Where log output is written.
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

fn build_filter(default_filter: &str, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init_logging(target: LogTarget<'_>, default_filter: &str, verbose: bool) {
    let filter = build_filter(default_filter, verbose);

    let result = match target {
        LogTarget::Stderr => registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogTarget::File(dir) => {
            if let Err(e) = fs::create_dir_all(dir) {
                eprintln!("Warning: Could not create log directory: {}", e);
            }
            match File::create(dir.join(LOG_FILE)) {
                Ok(file) => registry()
                    .with(filter)
                    .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                    .try_init(),
                Err(e) => {
                    eprintln!("Warning: Could not create log file: {}. Logging disabled.", e);
                    return;
                }
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: logging already initialised: {}", e);
    }
}
