use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal kanban board.
/// Settings default to ~/.quadro/config.json or a path passed via --config.
#[derive(Parser)]
#[command(name = "quadro", version, about = "Kanban board for the terminal")]
pub struct Cli {
    /// Path to a JSON config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `ui` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
