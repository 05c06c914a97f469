//! # Quadro - Kanban board for the terminal
//!
//! A four-column kanban board (Ideias, A Fazer, Fazendo, Feito) with drag and
//! drop driven by the mouse or the keyboard.
//!
//! ## Key Features
//!
//! - **Board State Store**: one owned store with immutable snapshots that
//!   observers receive after every change
//! - **Drag and Drop**: pointer drags resolved by closest corners, plus a
//!   keyboard sensor (space to pick up, arrows, space to drop)
//! - **Task Creation**: validated form with a simulated save delay
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the board
//! quadro
//!
//! # Show the columns and the effective configuration
//! quadro columns
//! quadro config
//! ```
//!
//! Settings are read from `~/.quadro/config.json`; the TUI logs to
//! `~/.quadro/quadro.log`.

use clap::Parser;

pub mod board;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod dnd;
pub mod error;
pub mod fields;
pub mod logging;
pub mod store;
pub mod task;
pub mod tui {
    pub mod collision;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod kanban;
    pub mod run;
    pub mod task_form;
}

use cli::Cli;
use cmd::*;
use config::{data_dir, Config};
use logging::{init_logging, LogTarget};

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui);

    let quadro_dir = data_dir();
    if let Err(e) = std::fs::create_dir_all(&quadro_dir) {
        eprintln!("Failed to create data directory {}: {}", quadro_dir.display(), e);
        std::process::exit(1);
    }

    let config = match Config::resolve(cli.config.as_deref(), &quadro_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    // The TUI owns the terminal, so its logs go to a file
    let target = match command {
        Commands::Ui => LogTarget::File(&quadro_dir),
        _ => LogTarget::Stderr,
    };
    init_logging(target, &config.log_filter, cli.verbose);
    tracing::debug!(dir = %quadro_dir.display(), ?config, "starting");

    match command {
        Commands::Ui => cmd_ui(&config),
        Commands::Columns => cmd_columns(),
        Commands::Config => cmd_config(&config),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
