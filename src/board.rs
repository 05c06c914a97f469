//! Board snapshot: the ordered columns and their ordered task sequences.
//!
//! A `Board` is a plain value. The store never mutates a board that has been
//! handed out; it clones the current snapshot, applies a change to the clone
//! and publishes the clone.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{BoardError, Result};
use crate::fields::ColumnId;
use crate::task::Task;

/// A workflow stage and the tasks currently in it, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub tasks: Vec<Task>,
}

impl Column {
    /// Create an empty column with its standard title.
    pub fn new(id: ColumnId) -> Self {
        Column {
            id,
            title: id.title().to_string(),
            tasks: Vec::new(),
        }
    }

    /// Position of a task within this column.
    pub fn position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }
}

/// Ordered sequence of all columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    columns: Vec<Column>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard board: Ideias, A Fazer, Fazendo, Feito, all empty.
    pub fn new() -> Self {
        Board {
            columns: ColumnId::ALL.into_iter().map(Column::new).collect(),
        }
    }

    /// Build a board from prepared columns (seeded boards and tests).
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Board { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    pub fn has_column(&self, id: ColumnId) -> bool {
        self.column(id).is_some()
    }

    /// Resolve a drop-target style string to a column on this board.
    pub fn column_by_str(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id.as_str() == id)
    }

    /// Find which column holds a task and at what index.
    pub fn locate(&self, task_id: &str) -> Option<(ColumnId, usize)> {
        self.columns
            .iter()
            .find_map(|c| c.position(task_id).map(|i| (c.id, i)))
    }

    /// Get a task by id (first match across all columns).
    pub fn get_task(&self, task_id: &str) -> Option<&Task> {
        self.columns
            .iter()
            .flat_map(|c| c.tasks.iter())
            .find(|t| t.id == task_id)
    }

    /// Total number of tasks on the board.
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Verify that every task id is unique and each status matches its column.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            for task in &column.tasks {
                if !seen.insert(task.id.as_str()) {
                    return Err(BoardError::DuplicateTask {
                        id: task.id.clone(),
                    });
                }
                if task.status != column.id {
                    return Err(BoardError::StatusMismatch {
                        id: task.id.clone(),
                        status: task.status,
                        column: column.id,
                    });
                }
            }
        }
        Ok(())
    }

    /// Append a task to the end of a column, forcing its status to match.
    pub(crate) fn push_task(&mut self, column: ColumnId, mut task: Task) -> Result<()> {
        let col = self
            .column_mut(column)
            .ok_or(BoardError::ColumnNotFound { id: column })?;
        task.status = column;
        col.tasks.push(task);
        Ok(())
    }

    /// Move a task from one column to the end of another.
    /// Returns `Ok(false)` when nothing changed.
    pub(crate) fn move_task(
        &mut self,
        task_id: &str,
        source: ColumnId,
        target: ColumnId,
    ) -> Result<bool> {
        if !self.has_column(source) {
            return Err(BoardError::ColumnNotFound { id: source });
        }
        if !self.has_column(target) {
            return Err(BoardError::ColumnNotFound { id: target });
        }
        if source == target {
            return Ok(false);
        }

        let Some(src) = self.column_mut(source) else {
            return Err(BoardError::ColumnNotFound { id: source });
        };
        let Some(index) = src.position(task_id) else {
            return Ok(false);
        };
        let task = src.tasks.remove(index);
        self.push_task(target, task)?;
        Ok(true)
    }

    /// Remove the task at `from` and reinsert it at `to` in the same column.
    pub(crate) fn reorder(&mut self, column: ColumnId, from: usize, to: usize) -> Result<bool> {
        let col = self
            .column_mut(column)
            .ok_or(BoardError::ColumnNotFound { id: column })?;
        let len = col.tasks.len();
        for index in [from, to] {
            if index >= len {
                return Err(BoardError::IndexOutOfRange { column, index, len });
            }
        }
        if from == to {
            return Ok(false);
        }
        let task = col.tasks.remove(from);
        col.tasks.insert(to, task);
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::task::NewTask;
    use chrono::NaiveDate;

    pub(crate) fn fields(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: format!("{title} description"),
            responsibles: vec!["Ana Silva".to_string()],
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    /// Build a standard board with the given task ids placed in each column.
    pub(crate) fn board_with(layout: &[(ColumnId, &[&str])]) -> Board {
        let mut board = Board::new();
        for (column, ids) in layout {
            for id in ids.iter() {
                board
                    .push_task(*column, Task::with_id(*id, fields(id), *column))
                    .unwrap();
            }
        }
        board
    }

    pub(crate) fn ids(board: &Board, column: ColumnId) -> Vec<String> {
        board
            .column(column)
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    #[test]
    fn test_new_board_has_fixed_columns_in_order() {
        let board = Board::new();
        let titles: Vec<&str> = board.columns().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Ideias", "A Fazer", "Fazendo", "Feito"]);
        assert_eq!(board.task_count(), 0);
    }

    #[test]
    fn test_locate_and_get_task() {
        let board = board_with(&[(ColumnId::Fazendo, &["a", "b"]), (ColumnId::Feito, &["c"])]);
        assert_eq!(board.locate("b"), Some((ColumnId::Fazendo, 1)));
        assert_eq!(board.locate("c"), Some((ColumnId::Feito, 0)));
        assert_eq!(board.locate("zzz"), None);
        assert_eq!(board.get_task("c").unwrap().status, ColumnId::Feito);
        assert!(board.get_task("zzz").is_none());
    }

    #[test]
    fn test_push_task_forces_status() {
        let mut board = Board::new();
        let task = Task::with_id("x", fields("x"), ColumnId::Feito);
        board.push_task(ColumnId::AFazer, task).unwrap();
        assert_eq!(board.get_task("x").unwrap().status, ColumnId::AFazer);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_move_preserves_relative_order() {
        let mut board = board_with(&[(ColumnId::AFazer, &["a", "b", "c"]), (ColumnId::Feito, &["d"])]);
        assert!(board.move_task("b", ColumnId::AFazer, ColumnId::Feito).unwrap());
        assert_eq!(ids(&board, ColumnId::AFazer), ["a", "c"]);
        assert_eq!(ids(&board, ColumnId::Feito), ["d", "b"]);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_move_to_missing_column_is_error_and_untouched() {
        let mut board = Board::from_columns(vec![Column::new(ColumnId::Ideias)]);
        board
            .push_task(ColumnId::Ideias, Task::with_id("a", fields("a"), ColumnId::Ideias))
            .unwrap();
        let before = board.clone();
        assert!(matches!(
            board.move_task("a", ColumnId::Ideias, ColumnId::Feito),
            Err(BoardError::ColumnNotFound { id: ColumnId::Feito })
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn test_reorder_bounds_checked() {
        let mut board = board_with(&[(ColumnId::Fazendo, &["a", "b"])]);
        assert!(matches!(
            board.reorder(ColumnId::Fazendo, 0, 2),
            Err(BoardError::IndexOutOfRange { index: 2, len: 2, .. })
        ));
        assert_eq!(ids(&board, ColumnId::Fazendo), ["a", "b"]);
    }

    #[test]
    fn test_check_invariants_reports_violations() {
        let mut dup = board_with(&[(ColumnId::Ideias, &["a"])]);
        dup.columns[3]
            .tasks
            .push(Task::with_id("a", fields("a"), ColumnId::Feito));
        assert!(matches!(dup.check_invariants(), Err(BoardError::DuplicateTask { .. })));

        let mut mismatch = board_with(&[(ColumnId::Ideias, &["a"])]);
        mismatch.columns[0].tasks[0].status = ColumnId::Feito;
        assert!(matches!(
            mismatch.check_invariants(),
            Err(BoardError::StatusMismatch { .. })
        ));
    }
}
