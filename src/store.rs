//! Board state store.
//!
//! `BoardStore` owns the current board snapshot and is the only place the
//! board changes. Every mutation builds a new `Board` value from the current
//! one and publishes it as a fresh `Arc<Board>`, so a reader holding an older
//! snapshot always sees a complete, consistent board. Observers (the view
//! layer) are notified synchronously after each published change.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::error::{BoardError, Result};
use crate::fields::ColumnId;
use crate::task::{NewTask, Task};

/// Column every new task lands in.
pub const INBOX_COLUMN: ColumnId = ColumnId::Ideias;

/// Default simulated latency of a task submission.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1000);

/// Handle returned by [`BoardStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&Arc<Board>)>;

/// A creation request waiting for its simulated delay to elapse.
#[derive(Debug)]
struct PendingSubmission {
    fields: NewTask,
    ready_at: Instant,
}

/// Owner of the board state.
pub struct BoardStore {
    board: Arc<Board>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    submit_delay: Duration,
    pending: Option<PendingSubmission>,
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(Board::new())
    }
}

impl BoardStore {
    pub fn new(board: Board) -> Self {
        BoardStore {
            board: Arc::new(board),
            observers: Vec::new(),
            next_subscription: 0,
            submit_delay: DEFAULT_SUBMIT_DELAY,
            pending: None,
        }
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    /// Current board snapshot.
    pub fn snapshot(&self) -> Arc<Board> {
        Arc::clone(&self.board)
    }

    /// Borrow the current board without bumping the reference count.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Register an observer called with every new snapshot.
    pub fn subscribe(&mut self, observer: impl Fn(&Arc<Board>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.observers.retain(|(sid, _)| *sid != id);
    }

    fn publish(&mut self, next: Board) {
        debug_assert!(next.check_invariants().is_ok());
        self.board = Arc::new(next);
        for (_, observer) in &self.observers {
            observer(&self.board);
        }
    }

    /// Create a task at the end of the inbox column.
    pub fn create_task(&mut self, fields: NewTask) -> Task {
        let task = Task::create(fields, INBOX_COLUMN);
        let mut next = Board::clone(&self.board);
        match next.push_task(INBOX_COLUMN, task.clone()) {
            Ok(()) => {
                info!(task_id = %task.id, title = %task.title, "task created");
                self.publish(next);
            }
            Err(e) => warn!(task_id = %task.id, error = %e, "task not added to board"),
        }
        task
    }

    /// Move a task to the end of another column. Returns whether the board changed.
    ///
    /// Unknown columns and tasks missing from `source` are ignored.
    pub fn move_task(&mut self, task_id: &str, source: ColumnId, target: ColumnId) -> bool {
        let mut next = Board::clone(&self.board);
        match next.move_task(task_id, source, target) {
            Ok(true) => {
                info!(task_id, %source, %target, "task moved");
                self.publish(next);
                true
            }
            Ok(false) => {
                debug!(task_id, %source, %target, "move skipped");
                false
            }
            Err(e) => {
                warn!(task_id, %source, %target, error = %e, "move ignored");
                false
            }
        }
    }

    /// Reposition a task inside one column.
    ///
    /// Indices must be in range; a violation is reported and the board is left as is.
    pub fn reorder_task(&mut self, column: ColumnId, from: usize, to: usize) -> Result<bool> {
        if from == to {
            // indices are validated even for a no-op
            let len = self
                .board
                .column(column)
                .ok_or(BoardError::ColumnNotFound { id: column })?
                .tasks
                .len();
            if from >= len {
                return Err(BoardError::IndexOutOfRange { column, index: from, len });
            }
            return Ok(false);
        }
        let mut next = Board::clone(&self.board);
        next.reorder(column, from, to)?;
        info!(%column, from, to, "task reordered");
        self.publish(next);
        Ok(true)
    }

    /// Look a task up anywhere on the board.
    pub fn get_task(&self, task_id: &str) -> Option<&Task> {
        self.board.get_task(task_id)
    }

    /// Queue a creation that completes after the submit delay.
    /// Returns false while another submission is still pending.
    pub fn submit_task(&mut self, fields: NewTask, now: Instant) -> bool {
        if self.pending.is_some() {
            debug!("submission already in flight");
            return false;
        }
        self.pending = Some(PendingSubmission {
            fields,
            ready_at: now + self.submit_delay,
        });
        true
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// Complete the pending submission once its delay has elapsed.
    pub fn poll_submission(&mut self, now: Instant) -> Option<Task> {
        let ready = self.pending.as_ref().is_some_and(|p| now >= p.ready_at);
        if !ready {
            return None;
        }
        let pending = self.pending.take()?;
        Some(self.create_task(pending.fields))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use super::*;
    use crate::board::tests::{board_with, fields, ids};
    use crate::board::Column;

    #[test]
    fn test_create_task_appends_to_ideias_only() {
        let mut store = BoardStore::new(board_with(&[
            (ColumnId::Ideias, &["i1"]),
            (ColumnId::Feito, &["f1"]),
        ]));
        let before = store.snapshot();

        let task = store.create_task(NewTask {
            title: "T".into(),
            description: "D".into(),
            responsibles: vec!["A".into()],
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        });

        assert_eq!(task.status, ColumnId::Ideias);
        let board = store.board();
        assert_eq!(ids(board, ColumnId::Ideias), ["i1".to_string(), task.id.clone()]);
        for column in [ColumnId::AFazer, ColumnId::Fazendo, ColumnId::Feito] {
            assert_eq!(board.column(column), before.column(column));
        }
        assert_eq!(board.task_count(), before.task_count() + 1);
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_created_ids_are_unique() {
        let mut store = BoardStore::default();
        let mut seen = HashSet::new();
        for i in 0..50 {
            let task = store.create_task(fields(&format!("t{i}")));
            assert!(seen.insert(task.id));
        }
        assert_eq!(store.board().task_count(), 50);
    }

    #[test]
    fn test_move_across_columns() {
        let mut store = BoardStore::new(board_with(&[
            (ColumnId::AFazer, &["x", "y"]),
            (ColumnId::Feito, &["z"]),
        ]));

        assert!(store.move_task("x", ColumnId::AFazer, ColumnId::Feito));
        let board = store.board();
        assert_eq!(ids(board, ColumnId::AFazer), ["y"]);
        assert_eq!(ids(board, ColumnId::Feito), ["z", "x"]);
        assert_eq!(store.get_task("x").unwrap().status, ColumnId::Feito);

        // repeating the same request finds nothing in the source any more
        let after_first = store.snapshot();
        assert!(!store.move_task("x", ColumnId::AFazer, ColumnId::Feito));
        assert_eq!(*store.snapshot(), *after_first);
    }

    #[test]
    fn test_move_same_column_is_noop() {
        let mut store = BoardStore::new(board_with(&[(ColumnId::Fazendo, &["a", "b"])]));
        let before = store.snapshot();
        assert!(!store.move_task("a", ColumnId::Fazendo, ColumnId::Fazendo));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_move_with_unknown_column_is_ignored() {
        let board = Board::from_columns(vec![Column::new(ColumnId::Ideias), Column::new(ColumnId::Feito)]);
        let mut store = BoardStore::new(board);
        let task = store.create_task(fields("a"));
        let before = store.snapshot();
        assert!(!store.move_task(&task.id, ColumnId::Ideias, ColumnId::Fazendo));
        assert!(!store.move_task(&task.id, ColumnId::AFazer, ColumnId::Feito));
        assert_eq!(*store.snapshot(), *before);
    }

    #[test]
    fn test_reorder_within_column() {
        let mut store = BoardStore::new(board_with(&[(ColumnId::Fazendo, &["A", "B", "C"])]));
        assert!(store.reorder_task(ColumnId::Fazendo, 0, 2).unwrap());
        assert_eq!(ids(store.board(), ColumnId::Fazendo), ["B", "C", "A"]);

        let before = store.snapshot();
        assert!(!store.reorder_task(ColumnId::Fazendo, 1, 1).unwrap());
        assert_eq!(ids(store.board(), ColumnId::Fazendo), ["B", "C", "A"]);
        assert!(Arc::ptr_eq(&before, &store.snapshot()));

        assert!(store.reorder_task(ColumnId::Fazendo, 2, 0).unwrap());
        assert_eq!(ids(store.board(), ColumnId::Fazendo), ["A", "B", "C"]);
    }

    #[test]
    fn test_reorder_out_of_range_leaves_board() {
        let mut store = BoardStore::new(board_with(&[(ColumnId::Fazendo, &["A"])]));
        let before = store.snapshot();
        assert!(store.reorder_task(ColumnId::Fazendo, 0, 1).is_err());
        assert!(store.reorder_task(ColumnId::Fazendo, 3, 3).is_err());
        assert!(store.reorder_task(ColumnId::Feito, 0, 0).is_err());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_old_snapshots_are_not_affected_by_mutation() {
        let mut store = BoardStore::new(board_with(&[(ColumnId::AFazer, &["a", "b"])]));
        let old = store.snapshot();
        store.move_task("a", ColumnId::AFazer, ColumnId::Feito);
        store.reorder_task(ColumnId::AFazer, 0, 0).unwrap();
        assert_eq!(ids(&old, ColumnId::AFazer), ["a", "b"]);
        assert!(ids(&old, ColumnId::Feito).is_empty());
        assert_eq!(ids(store.board(), ColumnId::Feito), ["a"]);
    }

    #[test]
    fn test_observers_receive_each_new_snapshot() {
        let mut store = BoardStore::default();
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |board| sink.borrow_mut().push(board.task_count()));

        let t = store.create_task(fields("a"));
        store.create_task(fields("b"));
        store.move_task(&t.id, ColumnId::Ideias, ColumnId::Ideias); // no-op, no notification
        store.move_task(&t.id, ColumnId::Ideias, ColumnId::Feito);
        assert_eq!(*seen.borrow(), [1, 2, 2]);

        store.unsubscribe(sub);
        store.create_task(fields("c"));
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_invariants_hold_across_a_session() {
        let mut store = BoardStore::default();
        let a = store.create_task(fields("a"));
        let b = store.create_task(fields("b"));
        let c = store.create_task(fields("c"));
        store.move_task(&a.id, ColumnId::Ideias, ColumnId::AFazer);
        store.move_task(&b.id, ColumnId::Ideias, ColumnId::AFazer);
        store.reorder_task(ColumnId::AFazer, 1, 0).unwrap();
        store.move_task(&c.id, ColumnId::Ideias, ColumnId::Feito);
        store.move_task(&a.id, ColumnId::AFazer, ColumnId::Fazendo);

        let board = store.board();
        board.check_invariants().unwrap();
        assert_eq!(board.task_count(), 3);
        for id in [&a.id, &b.id, &c.id] {
            let (column, _) = board.locate(id).unwrap();
            assert_eq!(board.get_task(id).unwrap().status, column);
        }
    }

    #[test]
    fn test_submission_completes_after_delay() {
        let mut store = BoardStore::default().with_submit_delay(Duration::from_millis(1000));
        let start = Instant::now();

        assert!(store.submit_task(fields("slow"), start));
        assert!(store.is_submitting());
        assert!(!store.submit_task(fields("again"), start + Duration::from_millis(10)));

        assert!(store.poll_submission(start + Duration::from_millis(999)).is_none());
        assert_eq!(store.board().task_count(), 0);

        let task = store.poll_submission(start + Duration::from_millis(1000)).unwrap();
        assert_eq!(task.title, "slow");
        assert!(!store.is_submitting());
        assert_eq!(store.board().task_count(), 1);
        assert!(store.poll_submission(start + Duration::from_secs(5)).is_none());
    }
}
