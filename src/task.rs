//! Task data structure.
//!
//! A `Task` is a single card on the board. Its `status` always names the
//! column currently holding it; the store keeps the two in sync.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::ColumnId;

/// A card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub responsibles: Vec<String>,
    pub date: NaiveDate,
    pub status: ColumnId,
}

/// Fields supplied by the creation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub responsibles: Vec<String>,
    pub date: NaiveDate,
}

impl Task {
    /// Build a task from form fields with a freshly generated id.
    pub fn create(fields: NewTask, status: ColumnId) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), fields, status)
    }

    /// Build a task with a caller-chosen id.
    pub fn with_id(id: impl Into<String>, fields: NewTask, status: ColumnId) -> Self {
        Task {
            id: id.into(),
            title: fields.title,
            description: fields.description,
            responsibles: fields.responsibles,
            date: fields.date,
            status,
        }
    }
}
