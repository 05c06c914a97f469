//! Kanban TUI entry point and terminal setup.

use std::io;

use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::info;

use crate::board::Board;
use crate::config::Config;
use crate::store::BoardStore;
use crate::tui::kanban::KanbanApp;

/// Initialise the terminal, run the board until the user quits, then restore it.
pub fn run_tui(config: &Config) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let store = BoardStore::new(Board::new()).with_submit_delay(config.submit_delay());
    let mut app = KanbanApp::new(config, store);
    info!("board opened");
    let result = app.run(&mut terminal);
    info!(tasks = app.board().task_count(), "board closed");

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}
