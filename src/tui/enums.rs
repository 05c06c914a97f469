//! Enumerations for TUI state management.

/// Which screen has keyboard focus.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Board,
    NewTask,
    TaskDetail,
    Help,
}
