//! Command implementations for the CLI interface.
//!
//! Each subcommand has a `cmd_*` handler. Handlers report failures on stderr
//! and exit with status 1.

use std::io::{self, Write};

use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::error;

use crate::board::Board;
use crate::config::Config;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive kanban board.
    Ui,

    /// List the board columns and their ids.
    Columns,

    /// Print the effective configuration as JSON.
    Config,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the kanban board TUI.
pub fn cmd_ui(config: &Config) {
    if let Err(e) = run_tui(config) {
        error!(error = %e, "terminal UI failed");
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Print the fixed column set in board order.
pub fn cmd_columns() {
    let board = Board::new();
    if let Err(e) = write_columns(&mut io::stdout(), &board) {
        eprintln!("Error writing columns: {e}");
        std::process::exit(1);
    }
}

fn write_columns(out: &mut impl Write, board: &Board) -> io::Result<()> {
    writeln!(out, "{:<10} {}", "Id", "Title")?;
    for column in board.columns() {
        writeln!(out, "{:<10} {}", column.id.as_str(), column.title)?;
    }
    Ok(())
}

/// Print the configuration in effect after defaults and file overrides.
pub fn cmd_config(config: &Config) {
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing config: {e}");
            std::process::exit(1);
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_columns_lists_board_order() {
        let mut out = Vec::new();
        write_columns(&mut out, &Board::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("ideias"));
        assert!(lines[2].starts_with("a-fazer") && lines[2].ends_with("A Fazer"));
        assert!(lines[4].ends_with("Feito"));
    }
}
